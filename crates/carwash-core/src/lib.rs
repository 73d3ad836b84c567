//! # carwash-core: Pure Business Logic for Carwash POS
//!
//! Everything that decides an invoice's amounts lives here, as pure
//! functions over plain data. No storage, no network, no clock reads
//! outside of the types' own timestamps.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Carwash POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI (invoice form, reports, catalog)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    carwash-pos commands                         │   │
//! │  │    create_invoice, list_services, render_receipt, etc.         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ carwash-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │  │ money  │ │ types  │ │ calculator │ │ receipt │ │ report │  │   │
//! │  │  │ Money  │ │Service │ │  ISV back- │ │ thermal │ │ totals │  │   │
//! │  │  │TaxRate │ │Invoice │ │    out     │ │  text   │ │  CSV   │  │   │
//! │  │  └────────┘ └────────┘ └────────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               carwash-store (Storage Layer)                     │   │
//! │  │        catalog, invoices, clients, invoice number sequence      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Invoice, Client, TaxRate)
//! - [`money`] - Money type with integer centavo arithmetic
//! - [`calculator`] - Invoice lines and ISV breakdown
//! - [`receipt`] - Thermal receipt text
//! - [`report`] - Sales summary and CSV export
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (RTN, codes, quantities)
//!
//! ## Example Usage
//!
//! ```rust
//! use carwash_core::money::Money;
//! use carwash_core::types::TaxRate;
//!
//! // L. 115.00 with ISV included
//! let price = Money::from_cents(11500);
//!
//! let (net, isv) = price.back_out_tax(TaxRate::ISV);
//! assert_eq!(net.cents(), 10000);
//! assert_eq!(isv.cents(), 1500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{ComputedLine, InvoiceCalculator, InvoiceComputation, InvoiceTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// ISO 4217 code of the Honduran lempira.
pub const CURRENCY_CODE: &str = "HNL";

/// Symbol printed before amounts (`L. 115.00`).
pub const CURRENCY_SYMBOL: &str = "L.";
