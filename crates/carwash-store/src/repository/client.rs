//! # Client Repository
//!
//! RTN-keyed cache of customers seen at the counter. It only saves the
//! operator from retyping names; invoices keep their own RTN and name.

use std::collections::HashMap;

use async_trait::async_trait;
use carwash_core::Client;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::ClientRepository;
use crate::error::{StoreError, StoreResult};

/// Clients held in process memory, keyed by RTN.
#[derive(Debug, Default)]
pub struct InMemoryClients {
    by_rtn: RwLock<HashMap<String, Client>>,
}

impl InMemoryClients {
    pub fn new() -> Self {
        InMemoryClients::default()
    }
}

fn new_client(rtn: &str, name: &str) -> Client {
    Client {
        id: Uuid::new_v4().to_string(),
        rtn: rtn.to_string(),
        name: name.trim().to_string(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ClientRepository for InMemoryClients {
    async fn get(&self, id: &str) -> StoreResult<Option<Client>> {
        Ok(self
            .by_rtn
            .read()
            .await
            .values()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn get_by_rtn(&self, rtn: &str) -> StoreResult<Option<Client>> {
        Ok(self.by_rtn.read().await.get(rtn).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Client>> {
        let mut clients: Vec<Client> = self.by_rtn.read().await.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.rtn.cmp(&b.rtn)));
        Ok(clients)
    }

    async fn create(&self, rtn: &str, name: &str) -> StoreResult<Client> {
        let mut clients = self.by_rtn.write().await;
        if clients.contains_key(rtn) {
            return Err(StoreError::duplicate("rtn", rtn));
        }

        let client = new_client(rtn, name);
        debug!(id = %client.id, rtn = %client.rtn, "Creating client");
        clients.insert(client.rtn.clone(), client.clone());
        Ok(client)
    }

    async fn upsert_if_absent(&self, rtn: &str, name: &str) -> StoreResult<Client> {
        let mut clients = self.by_rtn.write().await;
        let client = clients.entry(rtn.to_string()).or_insert_with(|| {
            let client = new_client(rtn, name);
            debug!(id = %client.id, rtn = %client.rtn, "Caching new client");
            client
        });
        Ok(client.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RTN: &str = "08011990123456";

    #[tokio::test]
    async fn test_upsert_never_overwrites_name() {
        let clients = InMemoryClients::new();

        let first = clients.upsert_if_absent(RTN, "Juan Pérez").await.unwrap();
        let second = clients.upsert_if_absent(RTN, "J. Perez").await.unwrap();

        assert_eq!(first.name, "Juan Pérez");
        assert_eq!(second.name, "Juan Pérez");
        assert_eq!(first.id, second.id);
        assert_eq!(clients.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_rtn() {
        let clients = InMemoryClients::new();
        clients.create(RTN, "Juan Pérez").await.unwrap();

        assert!(matches!(
            clients.create(RTN, "Otro").await,
            Err(StoreError::UniqueViolation { field, .. }) if field == "rtn"
        ));
    }

    #[tokio::test]
    async fn test_lookups() {
        let clients = InMemoryClients::new();
        let created = clients.create(RTN, "Juan Pérez").await.unwrap();

        assert_eq!(clients.get(&created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(clients.get_by_rtn(RTN).await.unwrap(), Some(created));
        assert!(clients.get_by_rtn("00000000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let clients = InMemoryClients::new();
        clients.create("00000000000002", "María López").await.unwrap();
        clients.create("00000000000001", "Ana Castro").await.unwrap();

        let names: Vec<String> = clients.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Ana Castro", "María López"]);
    }
}
