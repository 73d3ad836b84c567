//! # Report Commands
//!
//! Receipt text for the thermal printer, the sales summary screen and the
//! CSV export. All dates are business-local (`utc_offset_minutes`).

use carwash_core::receipt;
use carwash_core::report::{self, DateRange, SalesSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

/// CSV export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    /// Suggested file name, e.g. `facturas_2026-10-01_2026-10-19.csv`
    pub file_name: String,
    pub row_count: usize,
    pub content: String,
}

/// Renders the printable receipt of a committed invoice.
pub async fn render_receipt(
    store: &StoreState,
    config: &ConfigState,
    invoice_id: &str,
) -> Result<String, ApiError> {
    debug!(id = %invoice_id, "render_receipt command");

    let invoice = store
        .inner()
        .invoices()
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", invoice_id))?;

    Ok(receipt::render_receipt(
        &invoice,
        &config.business_info(),
        &config.receipt_settings(),
    ))
}

pub async fn sales_summary(
    store: &StoreState,
    config: &ConfigState,
    range: DateRange,
) -> Result<SalesSummary, ApiError> {
    debug!(from = ?range.from, to = ?range.to, "sales_summary command");
    range.validate()?;

    let invoices = store.inner().invoices().list_invoices().await?;
    Ok(SalesSummary::from_invoices(
        &invoices,
        &range,
        config.utc_offset_minutes,
    )?)
}

/// Exports the invoices in `range` as CSV, newest first.
pub async fn export_invoices_csv(
    store: &StoreState,
    config: &ConfigState,
    range: DateRange,
) -> Result<CsvExport, ApiError> {
    debug!(from = ?range.from, to = ?range.to, "export_invoices_csv command");
    range.validate()?;

    let invoices = store.inner().invoices().list_invoices().await?;
    let selected = report::filter_invoices(&invoices, &range, config.utc_offset_minutes);
    let content = report::invoices_to_csv(selected.iter().copied(), config.utc_offset_minutes);

    let file_name = match (range.from, range.to) {
        (None, None) => "facturas.csv".to_string(),
        (from, to) => format!(
            "facturas_{}_{}.csv",
            from.map_or_else(|| "inicio".to_string(), |d| d.to_string()),
            to.map_or_else(|| "hoy".to_string(), |d| d.to_string()),
        ),
    };

    info!(rows = selected.len(), file = %file_name, "Invoices exported");

    Ok(CsvExport {
        file_name,
        row_count: selected.len(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::invoice::{create_invoice, CreateInvoiceRequest, LineItemRequest};
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use carwash_core::report::CSV_HEADER;
    use chrono::NaiveDate;

    async fn state_with_invoice() -> (AppState, String) {
        let state = AppState::initialize(ConfigState::default()).await.unwrap();
        let services = state.store.inner().catalog().list().await.unwrap();
        let premium = services.iter().find(|s| s.code == "LAV001").unwrap();

        let invoice = create_invoice(
            &state.store,
            &state.config,
            CreateInvoiceRequest {
                client_rtn: "08011990123456".to_string(),
                client_name: "Juan Pérez".to_string(),
                items: vec![LineItemRequest {
                    service_id: premium.id.clone(),
                    quantity: Some(serde_json::json!(2)),
                }],
            },
        )
        .await
        .unwrap();

        (state, invoice.id)
    }

    #[tokio::test]
    async fn test_render_receipt() {
        let (state, id) = state_with_invoice().await;
        let text = render_receipt(&state.store, &state.config, &id).await.unwrap();

        assert!(text.contains("CARWASH"));
        assert!(text.contains("001-001-01-000000001"));
        assert!(text.contains("Juan Pérez"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("500.00"));
        assert!(text.lines().all(|l| l.chars().count() <= 32));
    }

    #[tokio::test]
    async fn test_render_unknown_receipt() {
        let state = AppState::initialize(ConfigState::default()).await.unwrap();
        let err = render_receipt(&state.store, &state.config, "nope")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_sales_summary_all_time() {
        let (state, _) = state_with_invoice().await;
        let summary = sales_summary(&state.store, &state.config, DateRange::all())
            .await
            .unwrap();

        assert_eq!(summary.invoice_count, 1);
        assert_eq!(summary.total_revenue.cents(), 50000);
        assert_eq!(summary.by_service.len(), 1);
        assert_eq!(summary.by_service[0].units, 2);
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let (state, _) = state_with_invoice().await;
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2026, 2, 1),
            to: NaiveDate::from_ymd_opt(2026, 1, 1),
        };

        let err = sales_summary(&state.store, &state.config, range)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = export_invoices_csv(&state.store, &state.config, range)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (state, _) = state_with_invoice().await;
        let export = export_invoices_csv(&state.store, &state.config, DateRange::all())
            .await
            .unwrap();

        assert_eq!(export.file_name, "facturas.csv");
        assert_eq!(export.row_count, 1);
        assert!(export.content.starts_with(&CSV_HEADER.join(",")));
        assert!(export.content.contains("001-001-01-000000001"));
    }

    #[tokio::test]
    async fn test_export_outside_range_is_header_only() {
        let (state, _) = state_with_invoice().await;
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2000, 1, 1),
            to: NaiveDate::from_ymd_opt(2000, 1, 31),
        };

        let export = export_invoices_csv(&state.store, &state.config, range)
            .await
            .unwrap();
        assert_eq!(export.row_count, 0);
        assert_eq!(export.file_name, "facturas_2000-01-01_2000-01-31.csv");
        assert_eq!(export.content.lines().count(), 1);
    }
}
