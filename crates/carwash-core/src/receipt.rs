//! # Thermal Receipt
//!
//! Renders a committed invoice as monospaced text for a thermal printer.
//!
//! ## Layout (58mm, 32 columns)
//! ```text
//! ┌────────────────────────────────┐
//! │      CARWASH PEÑA BLANCA       │
//! │      Peña Blanca, Cortés       │
//! │     Frente a Cielos y Pisos    │
//! │         Tel: 9464-8987         │
//! │      RTN: 08011987654321       │
//! │--------------------------------│
//! │Factura:    001-001-01-000000001│
//! │Fecha:                19/10/2026│
//! │Hora:                   14:05:09│
//! │Cliente: Juan Pérez             │
//! │RTN: 08011990123456             │
//! │--------------------------------│
//! │SERVICIOS:                      │
//! │Lavado Completo Premium   250.00│
//! │  1 x L. 250.00                 │
//! │--------------------------------│
//! │Subtotal Exento:        L. 0.00 │
//! │Subtotal Gravado:     L. 217.39 │
//! │ISV (15%):             L. 32.61 │
//! │================================│
//! │TOTAL:                L. 250.00 │
//! │--------------------------------│
//! │  ¡Gracias por su preferencia!  │
//! └────────────────────────────────┘
//! ```
//!
//! Widths are counted in characters, not bytes, so accented text lines up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{local_offset, Invoice, TaxRate, HONDURAS_UTC_OFFSET_MINUTES};

/// Printed when an invoice carries no client name.
pub const DEFAULT_CLIENT_NAME: &str = "Consumidor Final";

// =============================================================================
// Settings
// =============================================================================

/// Supported thermal paper rolls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaperWidth {
    #[default]
    #[serde(rename = "58mm")]
    Mm58,
    #[serde(rename = "80mm")]
    Mm80,
}

impl PaperWidth {
    /// Characters per line in the printer's default font.
    pub const fn columns(&self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }
}

impl fmt::Display for PaperWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperWidth::Mm58 => write!(f, "58mm"),
            PaperWidth::Mm80 => write!(f, "80mm"),
        }
    }
}

impl FromStr for PaperWidth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "58mm" | "58" => Ok(PaperWidth::Mm58),
            "80mm" | "80" => Ok(PaperWidth::Mm80),
            _ => Err(ValidationError::InvalidFormat {
                field: "paperWidth".to_string(),
                reason: "must be 58mm or 80mm".to_string(),
            }),
        }
    }
}

/// Business identity printed in the receipt header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub rtn: String,
}

impl Default for BusinessInfo {
    fn default() -> Self {
        BusinessInfo {
            name: "CARWASH PEÑA BLANCA".to_string(),
            address_lines: vec![
                "Peña Blanca, Cortés".to_string(),
                "Frente a Cielos y Pisos".to_string(),
            ],
            phone: "9464-8987".to_string(),
            rtn: "08011987654321".to_string(),
        }
    }
}

/// Printer and locale settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSettings {
    pub paper_width: PaperWidth,
    /// Rate shown in the `ISV (15%)` label.
    pub tax_rate: TaxRate,
    pub currency_symbol: String,
    pub footer_lines: Vec<String>,
    /// Offset applied to `created_at` for the printed date and time.
    pub utc_offset_minutes: i32,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            paper_width: PaperWidth::default(),
            tax_rate: TaxRate::ISV,
            currency_symbol: crate::CURRENCY_SYMBOL.to_string(),
            footer_lines: vec![
                "¡Gracias por su preferencia!".to_string(),
                "Factura generada por".to_string(),
                "Sistema CARWASH v1.0".to_string(),
            ],
            utc_offset_minutes: HONDURAS_UTC_OFFSET_MINUTES,
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders `invoice` as receipt text, one `\n`-terminated line per row.
pub fn render_receipt(invoice: &Invoice, business: &BusinessInfo, settings: &ReceiptSettings) -> String {
    let mut out = ReceiptWriter::new(settings.paper_width.columns());
    let symbol = settings.currency_symbol.as_str();

    // Header
    out.centered(&business.name);
    for line in &business.address_lines {
        out.centered(line);
    }
    if !business.phone.is_empty() {
        out.centered(&format!("Tel: {}", business.phone));
    }
    out.centered(&format!("RTN: {}", business.rtn));
    out.rule('-');

    // Invoice details
    let local = invoice.created_at.with_timezone(&local_offset(settings.utc_offset_minutes));
    out.pair("Factura:", &invoice.invoice_number);
    out.pair("Fecha:", &local.format("%d/%m/%Y").to_string());
    out.pair("Hora:", &local.format("%H:%M:%S").to_string());

    let client_name = match invoice.client_name.trim() {
        "" => DEFAULT_CLIENT_NAME,
        name => name,
    };
    let client_rtn = match invoice.client_rtn.trim() {
        "" => "---",
        rtn => rtn,
    };
    out.wrapped(&format!("Cliente: {}", client_name));
    out.wrapped(&format!("RTN: {}", client_rtn));
    out.rule('-');

    // Lines
    out.line("SERVICIOS:");
    for line in &invoice.lines {
        out.pair(&line.description, &line.line_subtotal.to_string());
        out.indented(2, &format!("{} x {} {}", line.quantity, symbol, line.unit_price));
    }
    out.rule('-');

    // Totals
    let amount = |m: Money| format!("{} {}", symbol, m);
    out.pair("Subtotal Exento:", &amount(invoice.subtotal_exempt));
    out.pair("Subtotal Gravado:", &amount(invoice.subtotal_taxable_net));
    out.pair(&format!("ISV ({}):", settings.tax_rate), &amount(invoice.tax_amount));
    out.rule('=');
    out.pair("TOTAL:", &amount(invoice.total));

    if !settings.footer_lines.is_empty() {
        out.rule('-');
        for line in &settings.footer_lines {
            out.centered(line);
        }
    }

    out.finish()
}

// =============================================================================
// Text Layout
// =============================================================================

struct ReceiptWriter {
    width: usize,
    buf: String,
}

impl ReceiptWriter {
    fn new(width: usize) -> Self {
        ReceiptWriter {
            width,
            buf: String::new(),
        }
    }

    fn line(&mut self, text: &str) {
        self.buf.push_str(text.trim_end());
        self.buf.push('\n');
    }

    fn rule(&mut self, ch: char) {
        let rule: String = std::iter::repeat(ch).take(self.width).collect();
        self.line(&rule);
    }

    fn wrapped(&mut self, text: &str) {
        for row in wrap(text, self.width) {
            self.line(&row);
        }
    }

    fn indented(&mut self, indent: usize, text: &str) {
        let indent = indent.min(self.width - 1);
        for row in wrap(text, self.width - indent) {
            self.line(&format!("{}{}", " ".repeat(indent), row));
        }
    }

    fn centered(&mut self, text: &str) {
        for row in wrap(text, self.width) {
            let pad = (self.width - char_len(&row)) / 2;
            self.line(&format!("{}{}", " ".repeat(pad), row));
        }
    }

    /// Left label, right-aligned value. Wraps the label when both don't fit.
    fn pair(&mut self, left: &str, right: &str) {
        let right_len = char_len(right);
        if right_len >= self.width {
            self.wrapped(left);
            self.wrapped(right);
            return;
        }

        let left_width = self.width - right_len - 1;
        let mut rows = wrap(left, left_width);
        let last = rows.pop().unwrap_or_default();
        for row in rows {
            self.line(&row);
        }

        let pad = self.width - char_len(&last) - right_len;
        self.line(&format!("{}{}{}", last, " ".repeat(pad), right));
    }

    fn finish(self) -> String {
        self.buf
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            rows.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            char_len(&current) + 1 + word.len()
        };
        if needed > width {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceLine;
    use chrono::{TimeZone, Utc};

    fn invoice(lines: Vec<InvoiceLine>) -> Invoice {
        Invoice {
            id: "inv-1".to_string(),
            invoice_number: "001-001-01-000000001".to_string(),
            client_id: "c-1".to_string(),
            client_rtn: "08011990123456".to_string(),
            client_name: "Juan Pérez".to_string(),
            subtotal_exempt: Money::from_cents(10000),
            subtotal_taxable_net: Money::from_cents(10000),
            tax_amount: Money::from_cents(1500),
            total: Money::from_cents(21500),
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 20, 5, 9).unwrap(),
            lines,
        }
    }

    fn line(description: &str, cents: i64, qty: i64, taxable: bool) -> InvoiceLine {
        InvoiceLine {
            service_id: "s".to_string(),
            code: "X".to_string(),
            description: description.to_string(),
            unit_price: Money::from_cents(cents),
            quantity: qty,
            line_subtotal: Money::from_cents(cents * qty),
            taxable,
        }
    }

    fn sample() -> Invoice {
        invoice(vec![
            line("Lavado Completo", 11500, 1, true),
            line("Aromatizante", 5000, 2, false),
        ])
    }

    #[test]
    fn test_receipt_contains_invoice_data() {
        let text = render_receipt(&sample(), &BusinessInfo::default(), &ReceiptSettings::default());

        assert!(text.contains("CARWASH PEÑA BLANCA"));
        assert!(text.contains("RTN: 08011987654321"));
        assert!(text.contains("001-001-01-000000001"));
        assert!(text.contains("Cliente: Juan Pérez"));
        assert!(text.contains("RTN: 08011990123456"));
        assert!(text.contains("SERVICIOS:"));
        assert!(text.contains("Lavado Completo"));
        assert!(text.contains("\n  2 x L. 50.00\n"));
        assert!(text.contains("¡Gracias por su preferencia!"));
    }

    #[test]
    fn test_receipt_totals_are_right_aligned() {
        let text = render_receipt(&sample(), &BusinessInfo::default(), &ReceiptSettings::default());
        let row = |label: &str| {
            text.lines()
                .find(|l| l.starts_with(label))
                .unwrap_or_else(|| panic!("missing {}", label))
                .to_string()
        };

        assert!(row("Subtotal Exento:").ends_with("L. 100.00"));
        assert!(row("Subtotal Gravado:").ends_with("L. 100.00"));
        assert!(row("ISV (15%):").ends_with("L. 15.00"));
        assert!(row("TOTAL:").ends_with("L. 215.00"));
        assert_eq!(char_len(&row("TOTAL:")), 32);
    }

    #[test]
    fn test_receipt_uses_local_time() {
        // 20:05:09 UTC is 14:05:09 in Honduras
        let text = render_receipt(&sample(), &BusinessInfo::default(), &ReceiptSettings::default());
        assert!(text.contains("19/10/2026"));
        assert!(text.contains("14:05:09"));

        let utc = ReceiptSettings {
            utc_offset_minutes: 0,
            ..Default::default()
        };
        let text = render_receipt(&sample(), &BusinessInfo::default(), &utc);
        assert!(text.contains("20:05:09"));
    }

    #[test]
    fn test_lines_never_exceed_paper_width() {
        let long = invoice(vec![line(
            "Lavado Completo Premium con Encerado, Aspirado Profundo y Aromatizante Extra Duradero",
            2_500_000_00,
            3,
            true,
        )]);

        for paper in [PaperWidth::Mm58, PaperWidth::Mm80] {
            let settings = ReceiptSettings {
                paper_width: paper,
                ..Default::default()
            };
            let text = render_receipt(&long, &BusinessInfo::default(), &settings);
            for row in text.lines() {
                assert!(
                    char_len(row) <= paper.columns(),
                    "{:?} row too wide: {:?}",
                    paper,
                    row
                );
            }
            assert!(text.contains("7500000.00"));
        }
    }

    #[test]
    fn test_empty_client_name_prints_consumidor_final() {
        let mut inv = sample();
        inv.client_name = "  ".to_string();
        let text = render_receipt(&inv, &BusinessInfo::default(), &ReceiptSettings::default());
        assert!(text.contains("Cliente: Consumidor Final"));
    }

    #[test]
    fn test_isv_label_follows_rate() {
        let settings = ReceiptSettings {
            tax_rate: TaxRate::from_bps(1800),
            ..Default::default()
        };
        let text = render_receipt(&sample(), &BusinessInfo::default(), &settings);
        assert!(text.contains("ISV (18%):"));
    }

    #[test]
    fn test_paper_width_parse() {
        assert_eq!("58mm".parse::<PaperWidth>().unwrap(), PaperWidth::Mm58);
        assert_eq!("80mm".parse::<PaperWidth>().unwrap(), PaperWidth::Mm80);
        assert!("110mm".parse::<PaperWidth>().is_err());
        assert_eq!(serde_json::to_string(&PaperWidth::Mm80).unwrap(), "\"80mm\"");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("uno dos tres", 7), vec!["uno dos", "tres"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("Peña Peña", 4), vec!["Peña", "Peña"]);
    }
}
