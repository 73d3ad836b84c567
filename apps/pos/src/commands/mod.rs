//! # Commands Module
//!
//! All commands exposed to the POS front end.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── invoice.rs  ◄─── Create, quote, list, next number
//! ├── catalog.rs  ◄─── Service CRUD
//! ├── client.rs   ◄─── Client cache, RTN check
//! ├── report.rs   ◄─── Receipt text, sales summary, CSV export
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Front end writes one line to stdin:                                   │
//! │  {"id":1,"command":"create_invoice","args":{"clientRtn":"...",...}}    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatcher::dispatch                                                   │
//! │    • looks up "create_invoice"                                          │
//! │    • deserializes args into CreateInvoiceRequest                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn create_invoice(                                               │
//! │      store: &StoreState,       ◄── Only the state it needs             │
//! │      config: &ConfigState,                                              │
//! │      request: CreateInvoiceRequest,                                     │
//! │  ) -> Result<Invoice, ApiError>                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"id":1,"ok":{...invoice...}}  or  {"id":1,"error":{"code":...}}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod invoice;
pub mod report;
