//! # Repository Module
//!
//! Storage traits for Carwash POS and their in-memory implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  POS command                                                           │
//! │       │                                                                 │
//! │       │  store.catalog().get("…")                                      │
//! │       ▼                                                                 │
//! │  dyn CatalogRepository / InvoiceRepository / ClientRepository          │
//! │       │                                                                 │
//! │       ├──► InMemoryCatalog   (RwLock<HashMap>)                         │
//! │       ├──► InMemoryInvoices  (RwLock<HashMap> + InvoiceSequencer)      │
//! │       └──► InMemoryClients   (RwLock<HashMap>)                         │
//! │                                                                         │
//! │  A durable backend implements the same traits; the calculator and the  │
//! │  command layer never see which one is behind the facade.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Service CRUD
//! - [`InvoiceRepository`] - Atomic invoice commit and lookup
//! - [`ClientRepository`] - RTN-keyed client cache

pub mod catalog;
pub mod client;
pub mod invoice;

use async_trait::async_trait;
use carwash_core::{Client, Invoice, InvoiceLine, NewService, Service, ServicePatch};

use crate::error::StoreResult;

pub use catalog::InMemoryCatalog;
pub use client::InMemoryClients;
pub use invoice::{InMemoryInvoices, NewInvoice};

/// Service catalog storage.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<Service>>;

    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Service>>;

    /// All services, sorted by code.
    async fn list(&self) -> StoreResult<Vec<Service>>;

    /// Inserts a service with a fresh id. Fails on a duplicate code.
    async fn create(&self, new: NewService) -> StoreResult<Service>;

    /// Applies a partial update. Fails on unknown id or a code taken by
    /// another service.
    async fn update(&self, id: &str, patch: ServicePatch) -> StoreResult<Service>;

    /// Removes a service. Invoices keep their line snapshots.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Append-only invoice storage.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Assigns the next invoice number and stores header and lines in one
    /// step. Fails with `EmptyInvoice` when `lines` is empty.
    async fn create_invoice(&self, header: NewInvoice, lines: Vec<InvoiceLine>) -> StoreResult<Invoice>;

    async fn get_invoice(&self, id: &str) -> StoreResult<Option<Invoice>>;

    /// Newest first; ties broken by invoice number, highest first.
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>>;

    /// The number the next commit will receive, without consuming it.
    async fn next_number_preview(&self) -> StoreResult<String>;
}

/// Client cache keyed by RTN.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<Client>>;

    async fn get_by_rtn(&self, rtn: &str) -> StoreResult<Option<Client>>;

    /// All clients, sorted by name.
    async fn list(&self) -> StoreResult<Vec<Client>>;

    /// Registers a new client. Fails on a duplicate RTN.
    async fn create(&self, rtn: &str, name: &str) -> StoreResult<Client>;

    /// Returns the client on file for `rtn`, creating it with `name` when
    /// absent. An existing name is never overwritten.
    async fn upsert_if_absent(&self, rtn: &str, name: &str) -> StoreResult<Client>;
}
