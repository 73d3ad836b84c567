//! # Catalog Commands
//!
//! Manage the services offered at the counter.
//!
//! Editing a service only affects invoices created afterwards; committed
//! lines carry their own copy of code, description and price.

use carwash_core::validation::{validate_new_service, validate_service_patch};
use carwash_core::{NewService, Service, ServicePatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::StoreState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub id: String,
    #[serde(flatten)]
    pub patch: ServicePatch,
}

/// Lists every service, sorted by code.
pub async fn list_services(store: &StoreState) -> Result<Vec<Service>, ApiError> {
    debug!("list_services command");
    Ok(store.inner().catalog().list().await?)
}

pub async fn get_service(store: &StoreState, id: &str) -> Result<Service, ApiError> {
    debug!(id = %id, "get_service command");
    store
        .inner()
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service", id))
}

/// Adds a service. The code must not be taken.
pub async fn create_service(store: &StoreState, new: NewService) -> Result<Service, ApiError> {
    debug!(code = %new.code, "create_service command");
    validate_new_service(&new)?;

    let service = store.inner().catalog().create(new).await?;
    info!(id = %service.id, code = %service.code, price = %service.price, "Service created");
    Ok(service)
}

pub async fn update_service(
    store: &StoreState,
    request: UpdateServiceRequest,
) -> Result<Service, ApiError> {
    debug!(id = %request.id, "update_service command");
    validate_service_patch(&request.patch)?;

    let service = store
        .inner()
        .catalog()
        .update(&request.id, request.patch)
        .await?;
    info!(id = %service.id, code = %service.code, "Service updated");
    Ok(service)
}

pub async fn delete_service(store: &StoreState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_service command");
    store.inner().catalog().delete(id).await?;
    info!(id = %id, "Service deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use carwash_core::Money;
    use carwash_store::Store;

    fn store() -> StoreState {
        StoreState::new(Store::in_memory(Default::default()))
    }

    fn new_service(code: &str) -> NewService {
        NewService {
            code: code.to_string(),
            description: "Lavado de Motor".to_string(),
            price: Money::from_cents(18000),
            category: "Lavado".to_string(),
            taxable: true,
            stock: -1,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let created = create_service(&store, new_service("LAV010")).await.unwrap();

        let fetched = get_service(&store, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(list_services(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let store = store();
        create_service(&store, new_service("LAV010")).await.unwrap();

        let err = create_service(&store, new_service("LAV010")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
    }

    #[tokio::test]
    async fn test_invalid_service_rejected() {
        let store = store();

        let mut negative = new_service("LAV010");
        negative.price = Money::from_cents(-100);
        let err = create_service(&store, negative).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_service(&store, new_service("")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_services(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_unpatched_fields() {
        let store = store();
        let created = create_service(&store, new_service("LAV010")).await.unwrap();

        let updated = update_service(
            &store,
            UpdateServiceRequest {
                id: created.id.clone(),
                patch: ServicePatch {
                    price: Some(Money::from_cents(20000)),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.price.cents(), 20000);
        assert_eq!(updated.code, "LAV010");
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn test_update_request_from_flat_json() {
        let request: UpdateServiceRequest = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "taxable": false
        }))
        .unwrap();

        assert_eq!(request.id, "abc");
        assert_eq!(request.patch.taxable, Some(false));
        assert_eq!(request.patch.price, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store();
        let created = create_service(&store, new_service("LAV010")).await.unwrap();

        delete_service(&store, &created.id).await.unwrap();

        let err = get_service(&store, &created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = delete_service(&store, &created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
