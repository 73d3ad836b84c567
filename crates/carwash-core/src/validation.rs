//! # Validation Module
//!
//! Input validation utilities for Carwash POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI form                                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: POS command (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: RTN, codes, prices, quantities                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Uniqueness (service code, client RTN)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use carwash_core::validation::{validate_rtn, validate_service_code};
//!
//! assert!(validate_rtn("08011987654321").is_ok());
//! assert!(validate_service_code("LAV001").is_ok());
//! ```

use serde_json::Value;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewService, ServicePatch, UNLIMITED_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length of a Honduran RTN.
pub const RTN_LENGTH: usize = 14;

const MAX_CODE_LEN: usize = 20;
const MAX_TEXT_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a Honduran RTN (Registro Tributario Nacional).
///
/// ## Rules
/// - Exactly 14 ASCII digits, no separators
///
/// ## Example
/// ```rust
/// use carwash_core::validation::validate_rtn;
///
/// assert!(validate_rtn("08011987654321").is_ok());
/// assert!(validate_rtn("0801-1987-654321").is_err());
/// assert!(validate_rtn("0801198765432").is_err());
/// ```
pub fn validate_rtn(rtn: &str) -> ValidationResult<()> {
    if rtn.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "rtn".to_string(),
        });
    }

    if rtn.len() != RTN_LENGTH || !rtn.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "rtn".to_string(),
            reason: format!("must be exactly {} digits", RTN_LENGTH),
        });
    }

    Ok(())
}

/// Validates a client name.
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_text("clientName", name, MAX_TEXT_LEN)
}

/// Validates a service code.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Only letters, digits, hyphens, underscores
pub fn validate_service_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price. Zero is allowed (courtesy items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level: `-1` (unlimited) or any non-negative count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < UNLIMITED_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: UNLIMITED_STOCK,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates an invoice line quantity.
///
/// ## Rules
/// - Must be a positive integer
pub fn validate_quantity(service_id: &str, qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(CoreError::invalid_quantity(service_id, "must be positive"));
    }

    Ok(())
}

/// Extracts a quantity from a raw JSON value.
///
/// The UI sends numbers straight from a form field, so `1.5`, `"2"` or
/// `null` can arrive. Anything other than a positive integral number is
/// `InvalidQuantity`; an absent quantity defaults to 1.
///
/// ## Example
/// ```rust
/// use carwash_core::validation::parse_quantity;
/// use serde_json::json;
///
/// assert_eq!(parse_quantity("svc", Some(&json!(3))).unwrap(), 3);
/// assert_eq!(parse_quantity("svc", None).unwrap(), 1);
/// assert!(parse_quantity("svc", Some(&json!(1.5))).is_err());
/// assert!(parse_quantity("svc", Some(&json!(0))).is_err());
/// ```
pub fn parse_quantity(service_id: &str, raw: Option<&Value>) -> CoreResult<i64> {
    let qty = match raw {
        None => 1,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(q) => q,
            None if n.as_u64().is_some() => {
                return Err(CoreError::invalid_quantity(service_id, "is too large"))
            }
            None => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    f as i64
                } else {
                    return Err(CoreError::invalid_quantity(service_id, "must be an integer"));
                }
            }
        },
        Some(_) => {
            return Err(CoreError::invalid_quantity(service_id, "must be a number"));
        }
    };

    validate_quantity(service_id, qty)?;
    Ok(qty)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a new catalog entry.
pub fn validate_new_service(service: &NewService) -> ValidationResult<()> {
    validate_service_code(&service.code)?;
    validate_text("description", &service.description, MAX_TEXT_LEN)?;
    validate_price(service.price)?;
    validate_text("category", &service.category, MAX_TEXT_LEN)?;
    validate_stock(service.stock)?;
    Ok(())
}

/// Validates the fields present in a service patch.
pub fn validate_service_patch(patch: &ServicePatch) -> ValidationResult<()> {
    if let Some(code) = &patch.code {
        validate_service_code(code)?;
    }
    if let Some(description) = &patch.description {
        validate_text("description", description, MAX_TEXT_LEN)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(category) = &patch.category {
        validate_text("category", category, MAX_TEXT_LEN)?;
    }
    if let Some(stock) = patch.stock {
        validate_stock(stock)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_rtn() {
        assert!(validate_rtn("08011987654321").is_ok());
        assert!(validate_rtn("00000000000000").is_ok());

        assert!(matches!(
            validate_rtn(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_rtn("0801198765432").is_err());
        assert!(validate_rtn("080119876543210").is_err());
        assert!(validate_rtn("0801198765432A").is_err());
        assert!(validate_rtn(" 0801198765432").is_err());
        // Non-ASCII digits are not accepted
        assert!(validate_rtn("٠٨٠١١٩٨٧٦٥٤٣٢١").is_err());
    }

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Juan Pérez").is_ok());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_service_code() {
        assert!(validate_service_code("LAV001").is_ok());
        assert!(validate_service_code("ENC-01_B").is_ok());

        assert!(validate_service_code("").is_err());
        assert!(validate_service_code("has space").is_err());
        assert!(validate_service_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(15000)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());

        assert!(validate_stock(-1).is_ok());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-2).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1500).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("s", Some(&json!(2))).unwrap(), 2);
        assert_eq!(parse_quantity("s", Some(&json!(3.0))).unwrap(), 3);
        assert_eq!(parse_quantity("s", None).unwrap(), 1);

        for bad in [json!(0), json!(-1), json!(2.5), json!("2"), json!(null), json!(u64::MAX)] {
            assert!(
                matches!(
                    parse_quantity("s", Some(&bad)),
                    Err(CoreError::InvalidQuantity { .. })
                ),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validate_new_service() {
        let mut service = NewService {
            code: "LAV003".to_string(),
            description: "Lavado de Motor".to_string(),
            price: Money::from_cents(20000),
            category: "Lavado".to_string(),
            taxable: true,
            stock: UNLIMITED_STOCK,
        };
        assert!(validate_new_service(&service).is_ok());

        service.category = String::new();
        assert!(validate_new_service(&service).is_err());
    }
}
