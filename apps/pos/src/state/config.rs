//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CARWASH_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable                     | Example             | Field                |
//! |------------------------------|---------------------|----------------------|
//! | `CARWASH_BUSINESS_NAME`      | `CARWASH PEÑA BLANCA` | `business_name`    |
//! | `CARWASH_BUSINESS_ADDRESS`   | `Peña Blanca, Cortés;Frente a ...` | `business_address` |
//! | `CARWASH_PHONE`              | `9464-8987`         | `business_phone`     |
//! | `CARWASH_BUSINESS_RTN`       | `08011987654321`    | `business_rtn`       |
//! | `CARWASH_ISV_RATE`           | `15`                | `isv_rate_bps`       |
//! | `CARWASH_INVOICE_PREFIX`     | `001-001-01`        | `invoice_prefix`     |
//! | `CARWASH_SEQUENCE_START`     | `1`                 | `sequence_start`     |
//! | `CARWASH_PAPER_WIDTH`        | `58mm`              | `paper_width`        |
//! | `CARWASH_UTC_OFFSET_MINUTES` | `-360`              | `utc_offset_minutes` |
//! | `CARWASH_SEED_CATALOG`       | `true`              | `seed_catalog`       |
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use carwash_core::calculator::InvoiceCalculator;
use carwash_core::receipt::{BusinessInfo, PaperWidth, ReceiptSettings};
use carwash_core::validation::{validate_rtn, validate_tax_rate_bps};
use carwash_core::{TaxRate, CURRENCY_CODE, CURRENCY_SYMBOL, HONDURAS_UTC_OFFSET_MINUTES};
use carwash_store::sequence::MAX_SEQUENCE;
use carwash_store::InvoicePrefix;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Business name (receipt header)
    pub business_name: String,

    /// Address lines (receipt header)
    pub business_address: Vec<String>,

    pub business_phone: String,

    /// The business's own RTN, printed on every receipt
    pub business_rtn: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// ISV rate in basis points
    /// e.g., 1500 = 15%
    pub isv_rate_bps: u32,

    /// Branch, point of sale and document type of invoice numbers
    pub invoice_prefix: InvoicePrefix,

    /// First counter value handed out after startup
    pub sequence_start: u64,

    pub paper_width: PaperWidth,

    /// Lines printed under the totals
    pub receipt_footer: Vec<String>,

    /// Business-local offset for receipt times and report days
    pub utc_offset_minutes: i32,

    /// Load the default car-wash services on startup
    pub seed_catalog: bool,
}

impl Default for ConfigState {
    /// Returns the configuration of the original Peña Blanca install.
    fn default() -> Self {
        let business = BusinessInfo::default();
        let receipt = ReceiptSettings::default();

        ConfigState {
            business_name: business.name,
            business_address: business.address_lines,
            business_phone: business.phone,
            business_rtn: business.rtn,
            currency_code: CURRENCY_CODE.to_string(),
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            isv_rate_bps: TaxRate::ISV.bps(),
            invoice_prefix: InvoicePrefix::default(),
            sequence_start: 1,
            paper_width: receipt.paper_width,
            receipt_footer: receipt.footer_lines,
            utc_offset_minutes: HONDURAS_UTC_OFFSET_MINUTES,
            seed_catalog: true,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigState::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigState::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(name) = var("CARWASH_BUSINESS_NAME") {
            config.business_name = name;
        }

        if let Some(address) = var("CARWASH_BUSINESS_ADDRESS") {
            config.business_address = address
                .split(';')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(phone) = var("CARWASH_PHONE") {
            config.business_phone = phone;
        }

        if let Some(rtn) = var("CARWASH_BUSINESS_RTN") {
            validate_rtn(&rtn).map_err(|_| invalid("CARWASH_BUSINESS_RTN"))?;
            config.business_rtn = rtn;
        }

        if let Some(rate) = var("CARWASH_ISV_RATE") {
            let pct: f64 = rate.parse().map_err(|_| invalid("CARWASH_ISV_RATE"))?;
            if !pct.is_finite() || pct < 0.0 {
                return Err(invalid("CARWASH_ISV_RATE"));
            }
            let bps = TaxRate::from_percentage(pct).bps();
            validate_tax_rate_bps(bps).map_err(|_| invalid("CARWASH_ISV_RATE"))?;
            config.isv_rate_bps = bps;
        }

        if let Some(prefix) = var("CARWASH_INVOICE_PREFIX") {
            config.invoice_prefix = prefix.parse().map_err(|_| invalid("CARWASH_INVOICE_PREFIX"))?;
        }

        if let Some(start) = var("CARWASH_SEQUENCE_START") {
            let start: u64 = start.parse().map_err(|_| invalid("CARWASH_SEQUENCE_START"))?;
            if start == 0 || start > MAX_SEQUENCE {
                return Err(invalid("CARWASH_SEQUENCE_START"));
            }
            config.sequence_start = start;
        }

        if let Some(width) = var("CARWASH_PAPER_WIDTH") {
            config.paper_width = width.parse().map_err(|_| invalid("CARWASH_PAPER_WIDTH"))?;
        }

        if let Some(offset) = var("CARWASH_UTC_OFFSET_MINUTES") {
            let minutes: i32 = offset.parse().map_err(|_| invalid("CARWASH_UTC_OFFSET_MINUTES"))?;
            if minutes.abs() >= 24 * 60 {
                return Err(invalid("CARWASH_UTC_OFFSET_MINUTES"));
            }
            config.utc_offset_minutes = minutes;
        }

        if let Some(seed) = var("CARWASH_SEED_CATALOG") {
            config.seed_catalog = match seed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(invalid("CARWASH_SEED_CATALOG")),
            };
        }

        Ok(config)
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.isv_rate_bps)
    }

    /// Calculator bound to the configured ISV rate.
    pub fn calculator(&self) -> InvoiceCalculator {
        InvoiceCalculator::new(self.tax_rate())
    }

    pub fn business_info(&self) -> BusinessInfo {
        BusinessInfo {
            name: self.business_name.clone(),
            address_lines: self.business_address.clone(),
            phone: self.business_phone.clone(),
            rtn: self.business_rtn.clone(),
        }
    }

    pub fn receipt_settings(&self) -> ReceiptSettings {
        ReceiptSettings {
            paper_width: self.paper_width,
            tax_rate: self.tax_rate(),
            currency_symbol: self.currency_symbol.clone(),
            footer_lines: self.receipt_footer.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}

fn invalid(name: &str) -> ConfigError {
    ConfigError::InvalidValue(name.to_string())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
