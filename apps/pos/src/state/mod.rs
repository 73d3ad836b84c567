//! # State Module
//!
//! Application state handed to every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 AppState (owned by the dispatcher)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                     │                          │                        │
//! │                     ▼                          ▼                        │
//! │           ┌──────────────────┐       ┌──────────────────┐              │
//! │           │   StoreState     │       │   ConfigState    │              │
//! │           │                  │       │                  │              │
//! │           │  Store (catalog, │       │  business info   │              │
//! │           │  invoices,       │       │  ISV rate        │              │
//! │           │  clients)        │       │  invoice prefix  │              │
//! │           └──────────────────┘       └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: repositories lock internally (tokio RwLock)             │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the parts they need (`&StoreState`, `&ConfigState`).

mod config;
mod store;

pub use config::{ConfigError, ConfigState};
pub use store::StoreState;

use carwash_store::{seed, InvoiceSequencer, Store, StoreResult};
use tracing::info;

/// Everything a running POS needs.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: StoreState,
    pub config: ConfigState,
}

impl AppState {
    /// Builds the in-memory store from `config` and seeds the catalog
    /// when enabled.
    pub async fn initialize(config: ConfigState) -> StoreResult<Self> {
        let sequencer =
            InvoiceSequencer::starting_at(config.invoice_prefix.clone(), config.sequence_start)?;
        let store = Store::in_memory_with_sequencer(sequencer);

        if config.seed_catalog {
            seed::seed_default_catalog(store.catalog()).await?;
        }

        info!(
            business = %config.business_name,
            isv = %config.tax_rate(),
            seeded = config.seed_catalog,
            "State initialized"
        );

        Ok(AppState {
            store: StoreState::new(store),
            config,
        })
    }
}
