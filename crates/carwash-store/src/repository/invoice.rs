//! # Invoice Repository
//!
//! Append-only invoice storage.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_invoice(header, lines)                                         │
//! │                                                                         │
//! │   1. lines empty? ──► EmptyInvoice (nothing allocated)                 │
//! │   2. take table write lock                                             │
//! │   3. sequencer.next_number() ──► "001-001-01-000000007"                │
//! │   4. insert header + lines under the new id                            │
//! │   5. release lock                                                      │
//! │                                                                         │
//! │  Readers hold the read lock, so they see either no invoice or the      │
//! │  whole invoice. Numbers are drawn in commit order.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use carwash_core::{Invoice, InvoiceLine, InvoiceTotals};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::InvoiceRepository;
use crate::error::{StoreError, StoreResult};
use crate::sequence::InvoiceSequencer;

/// Header fields of an invoice about to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub client_id: String,
    pub client_rtn: String,
    pub client_name: String,
    pub totals: InvoiceTotals,
}

#[derive(Debug, Default)]
struct InvoiceTables {
    headers: HashMap<String, Invoice>,
    lines: HashMap<String, Vec<InvoiceLine>>,
}

impl InvoiceTables {
    fn compose(&self, id: &str) -> Option<Invoice> {
        let mut invoice = self.headers.get(id)?.clone();
        invoice.lines = self.lines.get(id).cloned().unwrap_or_default();
        Some(invoice)
    }
}

/// Invoices held in process memory.
#[derive(Debug)]
pub struct InMemoryInvoices {
    tables: RwLock<InvoiceTables>,
    sequencer: Arc<InvoiceSequencer>,
}

impl InMemoryInvoices {
    pub fn new(sequencer: Arc<InvoiceSequencer>) -> Self {
        InMemoryInvoices {
            tables: RwLock::new(InvoiceTables::default()),
            sequencer,
        }
    }

    pub fn sequencer(&self) -> &InvoiceSequencer {
        &self.sequencer
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn create_invoice(&self, header: NewInvoice, lines: Vec<InvoiceLine>) -> StoreResult<Invoice> {
        if lines.is_empty() {
            return Err(StoreError::EmptyInvoice);
        }

        let mut tables = self.tables.write().await;
        let invoice_number = self.sequencer.next_number()?;
        let id = Uuid::new_v4().to_string();

        let record = Invoice {
            id: id.clone(),
            invoice_number,
            client_id: header.client_id,
            client_rtn: header.client_rtn,
            client_name: header.client_name,
            subtotal_exempt: header.totals.subtotal_exempt,
            subtotal_taxable_net: header.totals.subtotal_taxable_net,
            tax_amount: header.totals.tax_amount,
            total: header.totals.total,
            created_at: Utc::now(),
            lines: Vec::new(),
        };

        debug!(
            id = %id,
            invoice_number = %record.invoice_number,
            lines = lines.len(),
            "Inserting invoice"
        );

        tables.headers.insert(id.clone(), record.clone());
        tables.lines.insert(id, lines.clone());

        let mut invoice = record;
        invoice.lines = lines;
        Ok(invoice)
    }

    async fn get_invoice(&self, id: &str) -> StoreResult<Option<Invoice>> {
        Ok(self.tables.read().await.compose(id))
    }

    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let tables = self.tables.read().await;
        let mut invoices: Vec<Invoice> = tables
            .headers
            .keys()
            .filter_map(|id| tables.compose(id))
            .collect();

        invoices.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.invoice_number.cmp(&a.invoice_number))
        });
        Ok(invoices)
    }

    async fn next_number_preview(&self) -> StoreResult<String> {
        self.sequencer.preview()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
