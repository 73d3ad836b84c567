//! # Domain Types
//!
//! Core domain types used throughout Carwash POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Service      │   │     Invoice     │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (business)│   │  invoice_number │   │  rtn (business) │       │
//! │  │  price (ISV in) │   │  totals         │   │  name           │       │
//! │  │  taxable        │   │  lines[1..N]    │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxRate      │   │   InvoiceLine   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (u32)      │   │  snapshots of   │                             │
//! │  │  1500 = 15% ISV │   │  code/desc/price│                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for references
//! - Business ID: (code, invoice_number, rtn) - human-readable

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Stock value meaning "not inventory tracked" (services like a wash).
pub const UNLIMITED_STOCK: i64 = -1;

/// Honduras observes CST all year (UTC-06:00, no DST).
pub const HONDURAS_UTC_OFFSET_MINUTES: i32 = -360;

/// Builds the business-local offset used for receipt dates and report days.
///
/// Out-of-range values (beyond ±24h) fall back to UTC.
pub fn local_offset(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (Honduran ISV)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Honduran ISV, 15%.
    pub const ISV: TaxRate = TaxRate(1500);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::ISV
    }
}

/// Renders as a receipt label: `15%`, `12.5%`, `0.75%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// A catalog entry: a wash service or a product sold at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-facing code, unique across the catalog (e.g. `LAV001`).
    pub code: String,

    /// Text printed on the receipt.
    pub description: String,

    /// Unit price. ISV-inclusive when `taxable` is true.
    #[ts(as = "String")]
    pub price: Money,

    /// Grouping shown in the UI (Lavado, Detailing, Interior, ...).
    pub category: String,

    /// Whether the price carries ISV.
    pub taxable: bool,

    /// Units on hand; `-1` means unlimited.
    pub stock: i64,

    /// When the service was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Checks if the service is not inventory tracked.
    #[inline]
    pub fn has_unlimited_stock(&self) -> bool {
        self.stock == UNLIMITED_STOCK
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub code: String,
    pub description: String,
    #[ts(as = "String")]
    pub price: Money,
    pub category: String,
    #[serde(default = "default_taxable")]
    pub taxable: bool,
    #[serde(default = "default_stock")]
    pub stock: i64,
}

fn default_taxable() -> bool {
    true
}

fn default_stock() -> i64 {
    UNLIMITED_STOCK
}

/// Partial update of a service; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub code: Option<String>,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub price: Option<Money>,
    pub category: Option<String>,
    pub taxable: Option<bool>,
    pub stock: Option<i64>,
}

impl ServicePatch {
    /// Applies the patch onto an existing service.
    pub fn apply_to(self, service: &mut Service) {
        if let Some(code) = self.code {
            service.code = code;
        }
        if let Some(description) = self.description {
            service.description = description;
        }
        if let Some(price) = self.price {
            service.price = price;
        }
        if let Some(category) = self.category {
            service.category = category;
        }
        if let Some(taxable) = self.taxable {
            service.taxable = taxable;
        }
        if let Some(stock) = self.stock {
            service.stock = stock;
        }
    }
}

// =============================================================================
// Invoice Lines
// =============================================================================

/// Requested line: which service and how many.
///
/// Carries no price or description; both are re-read from the catalog
/// when the invoice is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineInput {
    pub service_id: String,
    pub quantity: i64,
}

impl InvoiceLineInput {
    pub fn new(service_id: impl Into<String>, quantity: i64) -> Self {
        InvoiceLineInput {
            service_id: service_id.into(),
            quantity,
        }
    }
}

/// A persisted invoice line.
/// Uses snapshot pattern to freeze catalog data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub service_id: String,
    /// Service code at time of sale (frozen).
    pub code: String,
    /// Description at time of sale (frozen).
    pub description: String,
    /// Unit price at time of sale (frozen).
    #[ts(as = "String")]
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity, ISV included when taxable.
    #[ts(as = "String")]
    pub line_subtotal: Money,
    /// Taxable flag at time of sale (frozen).
    pub taxable: bool,
}

// =============================================================================
// Invoice
// =============================================================================

/// A committed invoice. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// `001-001-01-000000001` style fiscal number.
    pub invoice_number: String,
    /// Cached client record this invoice was issued to.
    pub client_id: String,
    pub client_rtn: String,
    pub client_name: String,
    #[ts(as = "String")]
    pub subtotal_exempt: Money,
    /// Taxable amount with ISV backed out.
    #[ts(as = "String")]
    pub subtotal_taxable_net: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Sum of line subtotals; equals `total` for every committed invoice.
    /// `None` if the sum leaves the money range.
    pub fn lines_total(&self) -> Option<Money> {
        self.lines
            .iter()
            .try_fold(Money::zero(), |acc, l| acc.checked_add(l.line_subtotal))
    }
}

// =============================================================================
// Client
// =============================================================================

/// A customer known by RTN. A cache for the invoice form, not the
/// authority: invoices carry their own copies of RTN and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub rtn: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1500);
        assert_eq!(rate.bps(), 1500);
        assert!((rate.percentage() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(15.0).bps(), 1500);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_tax_rate_default_is_isv() {
        assert_eq!(TaxRate::default(), TaxRate::ISV);
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::ISV.to_string(), "15%");
        assert_eq!(TaxRate::from_bps(1250).to_string(), "12.5%");
        assert_eq!(TaxRate::from_bps(75).to_string(), "0.75%");
    }

    #[test]
    fn test_local_offset() {
        assert_eq!(local_offset(HONDURAS_UTC_OFFSET_MINUTES).local_minus_utc(), -6 * 3600);
        assert_eq!(local_offset(0).local_minus_utc(), 0);
        assert_eq!(local_offset(48 * 60).local_minus_utc(), 0);
    }

    #[test]
    fn test_service_patch_applies_only_present_fields() {
        let mut service = Service {
            id: "1".to_string(),
            code: "LAV001".to_string(),
            description: "Lavado".to_string(),
            price: Money::from_cents(25000),
            category: "Lavado".to_string(),
            taxable: true,
            stock: UNLIMITED_STOCK,
            created_at: Utc::now(),
        };

        ServicePatch {
            price: Some(Money::from_cents(27500)),
            taxable: Some(false),
            ..Default::default()
        }
        .apply_to(&mut service);

        assert_eq!(service.price.cents(), 27500);
        assert!(!service.taxable);
        assert_eq!(service.code, "LAV001");
        assert!(service.has_unlimited_stock());
    }

    #[test]
    fn test_new_service_defaults() {
        let json = r#"{"code":"CERA01","description":"Cera","price":"80.00","category":"Productos"}"#;
        let new: NewService = serde_json::from_str(json).unwrap();
        assert!(new.taxable);
        assert_eq!(new.stock, UNLIMITED_STOCK);
        assert_eq!(new.price.cents(), 8000);
    }

    #[test]
    fn test_invoice_serializes_camel_case_with_string_money() {
        let line = InvoiceLine {
            service_id: "s".to_string(),
            code: "LAV002".to_string(),
            description: "Lavado Básico".to_string(),
            unit_price: Money::from_cents(15000),
            quantity: 1,
            line_subtotal: Money::from_cents(15000),
            taxable: true,
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["serviceId"], "s");
        assert_eq!(value["unitPrice"], "150.00");
        assert_eq!(value["lineSubtotal"], "150.00");
    }
}
