//! # Catalog Repository
//!
//! In-memory service catalog.
//!
//! Codes are the human-facing key (`LAV001`) and must stay unique; ids are
//! what invoice lines reference.

use std::collections::HashMap;

use async_trait::async_trait;
use carwash_core::{NewService, Service, ServicePatch};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::CatalogRepository;
use crate::error::{StoreError, StoreResult};

/// Service catalog held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    services: RwLock<HashMap<String, Service>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }
}

fn code_taken(services: &HashMap<String, Service>, code: &str, except_id: Option<&str>) -> bool {
    services
        .values()
        .any(|s| s.code == code && Some(s.id.as_str()) != except_id)
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn get(&self, id: &str) -> StoreResult<Option<Service>> {
        Ok(self.services.read().await.get(id).cloned())
    }

    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Service>> {
        let code = code.trim();
        Ok(self
            .services
            .read()
            .await
            .values()
            .find(|s| s.code == code)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Service>> {
        let mut services: Vec<Service> = self.services.read().await.values().cloned().collect();
        services.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(services)
    }

    async fn create(&self, new: NewService) -> StoreResult<Service> {
        let code = new.code.trim().to_string();
        let mut services = self.services.write().await;

        if code_taken(&services, &code, None) {
            return Err(StoreError::duplicate("code", code));
        }

        let service = Service {
            id: Uuid::new_v4().to_string(),
            code,
            description: new.description.trim().to_string(),
            price: new.price,
            category: new.category.trim().to_string(),
            taxable: new.taxable,
            stock: new.stock,
            created_at: Utc::now(),
        };

        debug!(id = %service.id, code = %service.code, "Creating service");
        services.insert(service.id.clone(), service.clone());
        Ok(service)
    }

    async fn update(&self, id: &str, mut patch: ServicePatch) -> StoreResult<Service> {
        let mut services = self.services.write().await;

        if let Some(code) = patch.code.as_mut() {
            *code = code.trim().to_string();
            if code_taken(&services, code, Some(id)) {
                return Err(StoreError::duplicate("code", code.clone()));
            }
        }

        let service = services
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Service", id))?;

        debug!(id = %id, "Updating service");
        patch.apply_to(service);
        Ok(service.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting service");
        self.services
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Service", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
