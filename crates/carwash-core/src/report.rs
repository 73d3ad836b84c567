//! # Sales Reports
//!
//! Aggregations over committed invoices for the reports screen and the
//! CSV export. Dates are business-local (see [`local_offset`]).
//!
//! ```text
//! invoices ──► filter by DateRange ──┬──► SalesSummary
//!                                    │      ├── totals / average ticket
//!                                    │      ├── revenue per day (asc)
//!                                    │      └── revenue per service (desc)
//!                                    └──► invoices_to_csv
//! ```
//!
//! Per-service figures come from the line snapshots, so a service renamed or
//! deleted after the sale still reports under the description it was sold as.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::calculator::accumulate;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{divide_rounded, Money};
use crate::types::{local_offset, Invoice};
use crate::validation::ValidationResult;

/// CSV header row of the invoice export.
pub const CSV_HEADER: [&str; 8] = [
    "Fecha",
    "Número",
    "Cliente",
    "RTN",
    "Subtotal Exento",
    "Subtotal Gravado",
    "ISV",
    "Total",
];

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive date filter; an open end matches everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Matches every date.
    pub const fn all() -> Self {
        DateRange { from: None, to: None }
    }

    /// Builds a range, rejecting `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ValidationResult<Self> {
        let range = DateRange { from, to };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ValidationError::InvalidFormat {
                    field: "from".to_string(),
                    reason: "must not be after 'to'".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// The business-local calendar date an invoice was issued on.
pub fn business_date(invoice: &Invoice, utc_offset_minutes: i32) -> NaiveDate {
    invoice
        .created_at
        .with_timezone(&local_offset(utc_offset_minutes))
        .date_naive()
}

/// Invoices issued within `range`, keeping their input order.
pub fn filter_invoices<'a>(
    invoices: &'a [Invoice],
    range: &DateRange,
    utc_offset_minutes: i32,
) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|inv| range.contains(business_date(inv, utc_offset_minutes)))
        .collect()
}

// =============================================================================
// Summary
// =============================================================================

/// Revenue collected on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub invoice_count: usize,
    #[ts(as = "String")]
    pub revenue: Money,
}

/// Units sold and revenue for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRevenue {
    pub service_id: String,
    pub code: String,
    pub description: String,
    pub units: i64,
    #[ts(as = "String")]
    pub revenue: Money,
}

/// Totals over a set of invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub range: DateRange,
    pub invoice_count: usize,
    #[ts(as = "String")]
    pub subtotal_exempt: Money,
    #[ts(as = "String")]
    pub subtotal_taxable_net: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total_revenue: Money,
    /// `total_revenue / invoice_count`, rounded half-up; zero with no invoices.
    #[ts(as = "String")]
    pub average_ticket: Money,
    pub daily: Vec<DailyRevenue>,
    pub by_service: Vec<ServiceRevenue>,
}

impl SalesSummary {
    /// Summarizes the invoices falling inside `range`.
    ///
    /// Fails with `AmountOverflow` if a sum leaves the money range.
    pub fn from_invoices(
        invoices: &[Invoice],
        range: &DateRange,
        utc_offset_minutes: i32,
    ) -> CoreResult<Self> {
        let selected = filter_invoices(invoices, range, utc_offset_minutes);

        let mut subtotal_exempt = Money::zero();
        let mut subtotal_taxable_net = Money::zero();
        let mut tax_amount = Money::zero();
        let mut total_revenue = Money::zero();
        let mut daily: BTreeMap<NaiveDate, DailyRevenue> = BTreeMap::new();
        let mut services: HashMap<&str, ServiceRevenue> = HashMap::new();

        for invoice in &selected {
            subtotal_exempt =
                accumulate(subtotal_exempt, invoice.subtotal_exempt, "exempt subtotal")?;
            subtotal_taxable_net =
                accumulate(subtotal_taxable_net, invoice.subtotal_taxable_net, "taxable subtotal")?;
            tax_amount = accumulate(tax_amount, invoice.tax_amount, "tax amount")?;
            total_revenue = accumulate(total_revenue, invoice.total, "total revenue")?;

            let date = business_date(invoice, utc_offset_minutes);
            let day = daily.entry(date).or_insert_with(|| DailyRevenue {
                date,
                invoice_count: 0,
                revenue: Money::zero(),
            });
            day.invoice_count += 1;
            day.revenue = accumulate(day.revenue, invoice.total, "daily revenue")?;

            for line in &invoice.lines {
                let entry = services
                    .entry(line.service_id.as_str())
                    .or_insert_with(|| ServiceRevenue {
                        service_id: line.service_id.clone(),
                        code: line.code.clone(),
                        description: line.description.clone(),
                        units: 0,
                        revenue: Money::zero(),
                    });
                entry.units = entry
                    .units
                    .checked_add(line.quantity)
                    .ok_or_else(|| CoreError::AmountOverflow("units sold".to_string()))?;
                entry.revenue = accumulate(entry.revenue, line.line_subtotal, "service revenue")?;
            }
        }

        let mut by_service: Vec<ServiceRevenue> = services.into_values().collect();
        by_service.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.code.cmp(&b.code)));

        Ok(SalesSummary {
            range: *range,
            invoice_count: selected.len(),
            subtotal_exempt,
            subtotal_taxable_net,
            tax_amount,
            total_revenue,
            average_ticket: divide_rounded(total_revenue, selected.len() as i64),
            daily: daily.into_values().collect(),
            by_service,
        })
    }
}

// =============================================================================
// CSV Export
// =============================================================================

/// Renders invoices as CSV (RFC 4180 quoting, `\r\n` line endings).
pub fn invoices_to_csv<'a, I>(invoices: I, utc_offset_minutes: i32) -> String
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));

    for invoice in invoices {
        let date = business_date(invoice, utc_offset_minutes);
        push_row(
            &mut out,
            [
                date.format("%d/%m/%Y").to_string(),
                invoice.invoice_number.clone(),
                invoice.client_name.clone(),
                invoice.client_rtn.clone(),
                invoice.subtotal_exempt.to_string(),
                invoice.subtotal_taxable_net.to_string(),
                invoice.tax_amount.to_string(),
                invoice.total.to_string(),
            ],
        );
    }

    out
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(&field));
    }
    out.push_str("\r\n");
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
