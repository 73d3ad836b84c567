//! # Carwash POS Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Carwash POS                                      │
//! │                                                                         │
//! │  Front end ──stdin (JSON lines)──► main.rs ──► lib.rs::run             │
//! │            ◄─stdout (JSON lines)──                  │                   │
//! │                                                     ▼                   │
//! │                                    dispatcher ──► commands/*           │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                    carwash-store (catalog, invoices,   │
//! │                                    clients, sequence)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for testability.

#[tokio::main]
async fn main() {
    if let Err(e) = carwash_pos_lib::run().await {
        eprintln!("carwash-pos: {}", e);
        std::process::exit(1);
    }
}
