//! # carwash-store: Storage Layer for Carwash POS
//!
//! Everything the POS remembers between commands: the service catalog,
//! committed invoices, the client cache and the invoice number sequence.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Carwash POS Data Flow                            │
//! │                                                                         │
//! │  POS command (create_invoice)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  carwash-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │  Sequencer   │  │   │
//! │  │   │  (store.rs)   │    │ (repository/) │    │(sequence.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ catalog()     │───►│ Catalog       │    │ AtomicU64    │  │   │
//! │  │   │ invoices()    │───►│ Invoices ─────┼───►│ 001-001-01-  │  │   │
//! │  │   │ clients()     │───►│ Clients       │    │  000000001   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `Store` facade handed to commands
//! - [`repository`] - Repository traits and in-memory implementations
//! - [`sequence`] - Invoice number allocation
//! - [`seed`] - Default service catalog
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust
//! use carwash_store::{seed, InvoicePrefix, Store};
//!
//! # tokio_test_block(async {
//! let store = Store::in_memory(InvoicePrefix::default());
//! seed::seed_default_catalog(store.catalog()).await.unwrap();
//!
//! let services = store.catalog().list().await.unwrap();
//! assert_eq!(services.len(), 4);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod seed;
pub mod sequence;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use repository::{CatalogRepository, ClientRepository, InvoiceRepository, NewInvoice};
pub use sequence::{InvoicePrefix, InvoiceSequencer, MAX_SEQUENCE};
pub use store::Store;
