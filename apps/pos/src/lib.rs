//! # Carwash POS Library
//!
//! Backend of the car-wash point of sale: a JSON-lines command loop over
//! stdin/stdout on top of `carwash-store` and `carwash-core`.
//!
//! ## Module Organization
//! ```text
//! carwash_pos_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── dispatcher.rs   ◄─── Request routing, stdin/stdout loop
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── store.rs    ◄─── Store wrapper
//! │   └── config.rs   ◄─── Configuration state (CARWASH_* env)
//! ├── commands/
//! │   ├── invoice.rs  ◄─── Invoicing
//! │   ├── catalog.rs  ◄─── Service CRUD
//! │   ├── client.rs   ◄─── Client cache
//! │   ├── report.rs   ◄─── Receipts, summary, CSV
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, ConfigState};

/// Runs the POS until stdin is closed.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber on stderr, RUST_LOG overrides                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • CARWASH_* environment variables over defaults                     │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • In-memory store, invoice sequencer, default catalog               │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One JSON request per stdin line, one response per stdout line     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Carwash POS");

    let config = ConfigState::from_env()?;
    info!(prefix = %config.invoice_prefix, paper = %config.paper_width, "Configuration loaded");

    let state = AppState::initialize(config).await?;

    dispatcher::serve(&state, tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=carwash=trace` - Show trace for carwash crates only
/// - Default: INFO, DEBUG for carwash crates
///
/// Output goes to stderr; stdout is reserved for responses.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,carwash=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
