//! # Store Facade
//!
//! Bundles one catalog, one invoice and one client repository behind a
//! cheap-to-clone handle, the way commands receive their storage.
//!
//! ```text
//! AppState ──► Store ──┬── catalog()  ──► dyn CatalogRepository
//!                      ├── invoices() ──► dyn InvoiceRepository (+ sequencer)
//!                      └── clients()  ──► dyn ClientRepository
//! ```

use std::sync::Arc;

use carwash_core::Client;
use tracing::info;

use crate::error::StoreResult;
use crate::repository::{
    CatalogRepository, ClientRepository, InMemoryCatalog, InMemoryClients, InMemoryInvoices,
    InvoiceRepository,
};
use crate::sequence::{InvoicePrefix, InvoiceSequencer};

/// Shared handle to every repository.
#[derive(Clone)]
pub struct Store {
    catalog: Arc<dyn CatalogRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Assembles a store from arbitrary backends.
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        clients: Arc<dyn ClientRepository>,
    ) -> Self {
        Store {
            catalog,
            invoices,
            clients,
        }
    }

    /// In-memory backend numbering invoices from 1 under `prefix`.
    pub fn in_memory(prefix: InvoicePrefix) -> Self {
        Store::in_memory_with_sequencer(InvoiceSequencer::new(prefix))
    }

    /// In-memory backend using an already configured sequencer.
    pub fn in_memory_with_sequencer(sequencer: InvoiceSequencer) -> Self {
        info!(
            prefix = %sequencer.prefix(),
            next = sequencer.peek(),
            "Initializing in-memory store"
        );

        Store::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryInvoices::new(Arc::new(sequencer))),
            Arc::new(InMemoryClients::new()),
        )
    }

    pub fn catalog(&self) -> &dyn CatalogRepository {
        self.catalog.as_ref()
    }

    pub fn invoices(&self) -> &dyn InvoiceRepository {
        self.invoices.as_ref()
    }

    pub fn clients(&self) -> &dyn ClientRepository {
        self.clients.as_ref()
    }

    /// See [`ClientRepository::upsert_if_absent`].
    pub async fn upsert_client_if_absent(&self, rtn: &str, name: &str) -> StoreResult<Client> {
        self.clients.upsert_if_absent(rtn, name).await
    }

    /// See [`InvoiceRepository::next_number_preview`].
    pub async fn next_invoice_number_preview(&self) -> StoreResult<String> {
        self.invoices.next_number_preview().await
    }
}
