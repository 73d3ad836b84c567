//! # Invoice Commands
//!
//! ## create_invoice
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. validate clientRtn (14 digits) and clientName                      │
//! │  2. parse quantities (missing → 1, 1.5 / "2" / 0 → INVALID_QUANTITY)   │
//! │  3. load every referenced service from the catalog, as it is NOW       │
//! │  4. InvoiceCalculator::compute → lines + ISV breakdown                 │
//! │  5. upsert the client (never renames an existing one)                  │
//! │  6. InvoiceRepository::create_invoice → number + atomic insert         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices, descriptions and the taxable flag always come from the catalog;
//! the request only says which service and how many.

use std::collections::HashMap;

use carwash_core::validation::{parse_quantity, validate_client_name, validate_rtn};
use carwash_core::{CoreError, Invoice, InvoiceComputation, InvoiceLineInput, Service};
use carwash_store::NewInvoice;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

/// Line as sent by the invoice form.
///
/// `quantity` is kept raw so that `1.5` or `"2"` are reported as
/// `INVALID_QUANTITY` instead of a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub service_id: String,
    #[serde(default)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub client_rtn: String,
    pub client_name: String,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInvoiceRequest {
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
}

/// Turns raw form lines into validated line inputs.
fn parse_items(items: &[LineItemRequest]) -> Result<Vec<InvoiceLineInput>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::EmptyInvoice);
    }

    items
        .iter()
        .map(|item| {
            let quantity = parse_quantity(&item.service_id, item.quantity.as_ref())?;
            Ok(InvoiceLineInput::new(item.service_id.clone(), quantity))
        })
        .collect()
}

/// Reads the referenced services from the catalog and prices the lines.
async fn compute(
    store: &StoreState,
    config: &ConfigState,
    items: &[InvoiceLineInput],
) -> Result<InvoiceComputation, ApiError> {
    let mut services: HashMap<&str, Service> = HashMap::new();
    for item in items {
        if services.contains_key(item.service_id.as_str()) {
            continue;
        }
        if let Some(service) = store.inner().catalog().get(&item.service_id).await? {
            services.insert(item.service_id.as_str(), service);
        }
    }

    let computation = config
        .calculator()
        .compute(items, |id| services.get(id).cloned())?;
    Ok(computation)
}

/// Creates and commits an invoice.
pub async fn create_invoice(
    store: &StoreState,
    config: &ConfigState,
    request: CreateInvoiceRequest,
) -> Result<Invoice, ApiError> {
    debug!(
        client_rtn = %request.client_rtn,
        items = request.items.len(),
        "create_invoice command"
    );

    let rtn = request.client_rtn.trim();
    let name = request.client_name.trim();
    validate_rtn(rtn)?;
    validate_client_name(name)?;

    let items = parse_items(&request.items)?;
    let computation = compute(store, config, &items).await?;

    let client = store.inner().upsert_client_if_absent(rtn, name).await?;

    let header = NewInvoice {
        client_id: client.id,
        client_rtn: client.rtn,
        client_name: client.name,
        totals: computation.totals,
    };

    let invoice = store
        .inner()
        .invoices()
        .create_invoice(header, computation.invoice_lines())
        .await?;

    info!(
        id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        total = %invoice.total,
        lines = invoice.lines.len(),
        "Invoice created"
    );

    Ok(invoice)
}

/// Prices lines against the current catalog without committing anything.
///
/// Drives the live totals on the invoice form.
pub async fn quote_invoice(
    store: &StoreState,
    config: &ConfigState,
    request: QuoteInvoiceRequest,
) -> Result<InvoiceComputation, ApiError> {
    debug!(items = request.items.len(), "quote_invoice command");

    let items = parse_items(&request.items)?;
    compute(store, config, &items).await
}

/// All invoices, newest first.
pub async fn list_invoices(store: &StoreState) -> Result<Vec<Invoice>, ApiError> {
    debug!("list_invoices command");
    Ok(store.inner().invoices().list_invoices().await?)
}

pub async fn get_invoice(store: &StoreState, id: &str) -> Result<Invoice, ApiError> {
    debug!(id = %id, "get_invoice command");
    store
        .inner()
        .invoices()
        .get_invoice(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", id))
}

/// The number the next invoice will get. Does not consume it.
pub async fn next_invoice_number_preview(store: &StoreState) -> Result<String, ApiError> {
    debug!("next_invoice_number_preview command");
    Ok(store.inner().next_invoice_number_preview().await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use carwash_core::{Money, NewService};
    use serde_json::json;

    const RTN: &str = "08011990123456";

    async fn state() -> AppState {
        let config = ConfigState {
            seed_catalog: false,
            ..Default::default()
        };
        AppState::initialize(config).await.unwrap()
    }

    async fn add_service(state: &AppState, code: &str, price: &str, taxable: bool) -> Service {
        state
            .store
            .inner()
            .catalog()
            .create(NewService {
                code: code.to_string(),
                description: format!("Servicio {}", code),
                price: price.parse().unwrap(),
                category: "Lavado".to_string(),
                taxable,
                stock: -1,
            })
            .await
            .unwrap()
    }

    fn request(name: &str, items: Vec<LineItemRequest>) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            client_rtn: RTN.to_string(),
            client_name: name.to_string(),
            items,
        }
    }

    fn item(service: &Service, quantity: Value) -> LineItemRequest {
        LineItemRequest {
            service_id: service.id.clone(),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_create_invoice_computes_isv_breakdown() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "115.00", true).await;
        let soap = add_service(&state, "PRD001", "50.00", false).await;

        let invoice = create_invoice(
            &state.store,
            &state.config,
            request("Juan Pérez", vec![item(&wash, json!(1)), item(&soap, json!(2))]),
        )
        .await
        .unwrap();

        assert_eq!(invoice.invoice_number, "001-001-01-000000001");
        assert_eq!(invoice.subtotal_exempt.to_string(), "100.00");
        assert_eq!(invoice.subtotal_taxable_net.to_string(), "100.00");
        assert_eq!(invoice.tax_amount.to_string(), "15.00");
        assert_eq!(invoice.total.to_string(), "215.00");
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[1].quantity, 2);
        assert_eq!(invoice.lines_total(), Some(invoice.total));

        let stored = get_invoice(&state.store, &invoice.id).await.unwrap();
        assert_eq!(stored, invoice);
    }

    #[tokio::test]
    async fn test_missing_quantity_defaults_to_one() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;

        let invoice = create_invoice(
            &state.store,
            &state.config,
            request(
                "Ana",
                vec![LineItemRequest {
                    service_id: wash.id.clone(),
                    quantity: None,
                }],
            ),
        )
        .await
        .unwrap();

        assert_eq!(invoice.lines[0].quantity, 1);
        assert_eq!(invoice.total.cents(), 25000);
    }

    #[tokio::test]
    async fn test_empty_invoice_rejected() {
        let state = state().await;
        let err = create_invoice(&state.store, &state.config, request("Ana", vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyInvoice);
        // Nothing consumed, nothing cached
        assert_eq!(
            next_invoice_number_preview(&state.store).await.unwrap(),
            "001-001-01-000000001"
        );
        assert!(state.store.inner().clients().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_service_rejected_at_commit() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;
        let lines = vec![item(&wash, json!(1))];

        state.store.inner().catalog().delete(&wash.id).await.unwrap();

        let err = create_invoice(&state.store, &state.config, request("Ana", lines))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownService);
        assert!(list_invoices(&state.store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_quantities_rejected() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;

        for qty in [json!(0), json!(-2), json!(1.5), json!("2")] {
            let err = create_invoice(
                &state.store,
                &state.config,
                request("Ana", vec![item(&wash, qty.clone())]),
            )
            .await
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidQuantity, "quantity {}", qty);
        }
    }

    #[tokio::test]
    async fn test_invalid_client_fields_rejected() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;

        let mut bad_rtn = request("Ana", vec![item(&wash, json!(1))]);
        bad_rtn.client_rtn = "0801-1990-12345".to_string();
        let err = create_invoice(&state.store, &state.config, bad_rtn).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_invoice(
            &state.store,
            &state.config,
            request("   ", vec![item(&wash, json!(1))]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_price_change_does_not_touch_past_invoices() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;

        let first = create_invoice(
            &state.store,
            &state.config,
            request("Ana", vec![item(&wash, json!(1))]),
        )
        .await
        .unwrap();

        state
            .store
            .inner()
            .catalog()
            .update(
                &wash.id,
                carwash_core::ServicePatch {
                    price: Some(Money::from_cents(30000)),
                    description: Some("Lavado Renombrado".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let second = create_invoice(
            &state.store,
            &state.config,
            request("Ana", vec![item(&wash, json!(1))]),
        )
        .await
        .unwrap();

        let first = get_invoice(&state.store, &first.id).await.unwrap();
        assert_eq!(first.total.cents(), 25000);
        assert_eq!(first.lines[0].description, "Servicio LAV001");
        assert_eq!(second.total.cents(), 30000);
        assert_eq!(second.lines[0].description, "Lavado Renombrado");
    }

    #[tokio::test]
    async fn test_client_cached_name_is_kept() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "250.00", true).await;

        create_invoice(
            &state.store,
            &state.config,
            request("Juan Pérez", vec![item(&wash, json!(1))]),
        )
        .await
        .unwrap();
        let second = create_invoice(
            &state.store,
            &state.config,
            request("J. Perez", vec![item(&wash, json!(1))]),
        )
        .await
        .unwrap();

        assert_eq!(second.client_name, "Juan Pérez");
        assert_eq!(state.store.inner().clients().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quote_does_not_commit() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "115.00", true).await;

        let quote = quote_invoice(
            &state.store,
            &state.config,
            QuoteInvoiceRequest {
                items: vec![item(&wash, json!(1))],
            },
        )
        .await
        .unwrap();

        assert_eq!(quote.totals.tax_amount.cents(), 1500);
        assert!(list_invoices(&state.store).await.unwrap().is_empty());
        assert_eq!(
            next_invoice_number_preview(&state.store).await.unwrap(),
            "001-001-01-000000001"
        );
    }

    #[tokio::test]
    async fn test_numbers_are_sequential_and_listed_newest_first() {
        let state = state().await;
        let wash = add_service(&state, "LAV001", "100.00", true).await;

        for _ in 0..3 {
            create_invoice(
                &state.store,
                &state.config,
                request("Ana", vec![item(&wash, json!(1))]),
            )
            .await
            .unwrap();
        }

        let listed = list_invoices(&state.store).await.unwrap();
        let numbers: Vec<&str> = listed.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(
            numbers,
            ["001-001-01-000000003", "001-001-01-000000002", "001-001-01-000000001"]
        );
        assert_eq!(
            next_invoice_number_preview(&state.store).await.unwrap(),
            "001-001-01-000000004"
        );
    }

    #[tokio::test]
    async fn test_get_unknown_invoice() {
        let state = state().await;
        let err = get_invoice(&state.store, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
