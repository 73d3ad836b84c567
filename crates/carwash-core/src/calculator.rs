//! # Invoice Calculator
//!
//! Turns requested lines into priced invoice lines and the ISV breakdown
//! printed on the receipt.
//!
//! ## Tax Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog prices of taxable services INCLUDE ISV.                       │
//! │                                                                         │
//! │  line_subtotal = round2(price × qty)                                   │
//! │                                                                         │
//! │  taxable line:                        exempt line:                      │
//! │    net = round2(subtotal / 1.15)        subtotal_exempt += subtotal     │
//! │    tax = subtotal - net                                                 │
//! │    subtotal_taxable_net += net                                          │
//! │    tax_amount += tax                                                    │
//! │                                                                         │
//! │  total = exempt + taxable_net + tax  ==  Σ line_subtotal                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens once per line, before aggregation, so the receipt
//! lines always add up to the printed totals.
//!
//! ## Example
//! ```rust
//! use carwash_core::calculator::InvoiceCalculator;
//! use carwash_core::types::TaxRate;
//! # use carwash_core::{Money, Service};
//! # use chrono::Utc;
//! # let service = |id: &str, cents, taxable| Service {
//! #     id: id.to_string(), code: id.to_uppercase(), description: id.to_string(),
//! #     price: Money::from_cents(cents), category: "Lavado".to_string(),
//! #     taxable, stock: -1, created_at: Utc::now(),
//! # };
//!
//! let calculator = InvoiceCalculator::new(TaxRate::ISV);
//! let result = calculator
//!     .compute_pairs(&[(service("wash", 11500, true), 1), (service("soap", 5000, false), 2)])
//!     .unwrap();
//!
//! assert_eq!(result.totals.subtotal_exempt.to_string(), "100.00");
//! assert_eq!(result.totals.subtotal_taxable_net.to_string(), "100.00");
//! assert_eq!(result.totals.tax_amount.to_string(), "15.00");
//! assert_eq!(result.totals.total.to_string(), "215.00");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InvoiceLine, InvoiceLineInput, Service, TaxRate};
use crate::validation::validate_quantity;

// =============================================================================
// Results
// =============================================================================

/// Aggregate amounts of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    #[ts(as = "String")]
    pub subtotal_exempt: Money,
    #[ts(as = "String")]
    pub subtotal_taxable_net: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total: Money,
}

/// A priced line together with its share of the ISV breakdown.
///
/// For exempt lines `net == line_subtotal` and `tax` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComputedLine {
    pub line: InvoiceLine,
    #[ts(as = "String")]
    pub net: Money,
    #[ts(as = "String")]
    pub tax: Money,
}

/// Output of [`InvoiceCalculator`]: lines in request order plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceComputation {
    pub lines: Vec<ComputedLine>,
    pub totals: InvoiceTotals,
}

impl InvoiceComputation {
    /// The persisted form of the lines.
    pub fn invoice_lines(&self) -> Vec<InvoiceLine> {
        self.lines.iter().map(|c| c.line.clone()).collect()
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes invoice lines and totals at a configured ISV rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceCalculator {
    tax_rate: TaxRate,
}

impl Default for InvoiceCalculator {
    fn default() -> Self {
        InvoiceCalculator::new(TaxRate::default())
    }
}

impl InvoiceCalculator {
    /// Creates a calculator for the given tax rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        InvoiceCalculator { tax_rate }
    }

    /// The rate used for backing out ISV.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Resolves each requested line against the catalog, then prices it.
    ///
    /// `resolve` must read the catalog as it is at commit time; a service
    /// deleted since the form was filled yields `UnknownService`.
    ///
    /// ## Errors
    /// - `EmptyInvoice` when `items` is empty
    /// - `UnknownService` when an id does not resolve
    /// - `InvalidQuantity` when a quantity is not a positive integer
    pub fn compute<F>(&self, items: &[InvoiceLineInput], mut resolve: F) -> CoreResult<InvoiceComputation>
    where
        F: FnMut(&str) -> Option<Service>,
    {
        if items.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        let mut pairs = Vec::with_capacity(items.len());
        for item in items {
            let service = resolve(&item.service_id)
                .ok_or_else(|| CoreError::UnknownService(item.service_id.clone()))?;
            pairs.push((service, item.quantity));
        }

        self.compute_pairs(&pairs)
    }

    /// Prices already-resolved `(service, quantity)` pairs.
    pub fn compute_pairs(&self, pairs: &[(Service, i64)]) -> CoreResult<InvoiceComputation> {
        if pairs.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        let mut totals = InvoiceTotals::default();
        let mut lines = Vec::with_capacity(pairs.len());

        for (service, quantity) in pairs {
            let computed = self.price_line(service, *quantity)?;

            if computed.line.taxable {
                totals.subtotal_taxable_net =
                    accumulate(totals.subtotal_taxable_net, computed.net, "taxable subtotal")?;
                totals.tax_amount = accumulate(totals.tax_amount, computed.tax, "tax amount")?;
            } else {
                totals.subtotal_exempt = accumulate(
                    totals.subtotal_exempt,
                    computed.line.line_subtotal,
                    "exempt subtotal",
                )?;
            }

            lines.push(computed);
        }

        let taxed = accumulate(totals.subtotal_taxable_net, totals.tax_amount, "invoice total")?;
        totals.total = accumulate(totals.subtotal_exempt, taxed, "invoice total")?;

        Ok(InvoiceComputation { lines, totals })
    }

    /// Prices a single line, snapshotting the service's current data.
    pub fn price_line(&self, service: &Service, quantity: i64) -> CoreResult<ComputedLine> {
        validate_quantity(&service.id, quantity)?;

        let line_subtotal = service
            .price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| CoreError::invalid_quantity(&service.id, "line amount is too large"))?;

        let (net, tax) = if service.taxable {
            line_subtotal.back_out_tax(self.tax_rate)
        } else {
            (line_subtotal, Money::zero())
        };

        Ok(ComputedLine {
            line: InvoiceLine {
                service_id: service.id.clone(),
                code: service.code.clone(),
                description: service.description.clone(),
                unit_price: service.price,
                quantity,
                line_subtotal,
                taxable: service.taxable,
            },
            net,
            tax,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

/// Adds `amount` to a running total, naming the total on overflow.
pub(crate) fn accumulate(total: Money, amount: Money, what: &str) -> CoreResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| CoreError::AmountOverflow(what.to_string()))
}
