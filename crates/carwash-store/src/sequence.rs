//! # Invoice Number Sequencer
//!
//! Hands out fiscal invoice numbers of the form
//! `{branch}-{pos}-{type}-{counter}`, e.g. `001-001-01-000000001`.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next: AtomicU64 = 1                                                    │
//! │                                                                         │
//! │  task A ── fetch_update ──► 1  ──► "001-001-01-000000001"              │
//! │  task B ── fetch_update ──► 2  ──► "001-001-01-000000002"              │
//! │  task C ── fetch_update ──► 3  ──► "001-001-01-000000003"              │
//! │                                                                         │
//! │  One atomic read-modify-write per allocation: no two callers ever      │
//! │  observe the same value, and a number is never reissued.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The counter lives in process memory. A caller that persists the last
//! issued value can resume with [`InvoiceSequencer::starting_at`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use carwash_core::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Largest counter value that fits the 9-digit field.
pub const MAX_SEQUENCE: u64 = 999_999_999;

// =============================================================================
// Prefix
// =============================================================================

/// Branch, point of sale and document type of an invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoicePrefix {
    branch: String,
    pos: String,
    doc_type: String,
}

impl InvoicePrefix {
    /// Builds a prefix from its three parts.
    ///
    /// ## Rules
    /// - `branch`: 3 digits
    /// - `pos`: 3 digits
    /// - `doc_type`: 2 digits
    pub fn new(branch: &str, pos: &str, doc_type: &str) -> Result<Self, ValidationError> {
        check_digits("branch", branch, 3)?;
        check_digits("pos", pos, 3)?;
        check_digits("docType", doc_type, 2)?;

        Ok(InvoicePrefix {
            branch: branch.to_string(),
            pos: pos.to_string(),
            doc_type: doc_type.to_string(),
        })
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn pos(&self) -> &str {
        &self.pos
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Formats a full invoice number with this prefix.
    pub fn format(&self, counter: u64) -> String {
        format!("{}-{:09}", self, counter)
    }
}

impl Default for InvoicePrefix {
    fn default() -> Self {
        InvoicePrefix {
            branch: "001".to_string(),
            pos: "001".to_string(),
            doc_type: "01".to_string(),
        }
    }
}

impl fmt::Display for InvoicePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.branch, self.pos, self.doc_type)
    }
}

impl FromStr for InvoicePrefix {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        match parts.as_slice() {
            [branch, pos, doc_type] => InvoicePrefix::new(branch, pos, doc_type),
            _ => Err(ValidationError::InvalidFormat {
                field: "invoicePrefix".to_string(),
                reason: "expected BBB-PPP-TT".to_string(),
            }),
        }
    }
}

impl TryFrom<String> for InvoicePrefix {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoicePrefix> for String {
    fn from(prefix: InvoicePrefix) -> Self {
        prefix.to_string()
    }
}

fn check_digits(field: &str, value: &str, len: usize) -> Result<(), ValidationError> {
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be exactly {} digits", len),
        });
    }
    Ok(())
}

// =============================================================================
// Sequencer
// =============================================================================

/// Process-local, thread-safe invoice number allocator.
#[derive(Debug)]
pub struct InvoiceSequencer {
    prefix: InvoicePrefix,
    next: AtomicU64,
    issued: AtomicU64,
}

impl InvoiceSequencer {
    /// Creates a sequencer whose first number ends in `000000001`.
    pub fn new(prefix: InvoicePrefix) -> Self {
        InvoiceSequencer {
            prefix,
            next: AtomicU64::new(1),
            issued: AtomicU64::new(0),
        }
    }

    /// Creates a sequencer whose first allocation is `start`.
    pub fn starting_at(prefix: InvoicePrefix, start: u64) -> StoreResult<Self> {
        if start == 0 || start > MAX_SEQUENCE {
            return Err(ValidationError::OutOfRange {
                field: "sequenceStart".to_string(),
                min: 1,
                max: MAX_SEQUENCE as i64,
            }
            .into());
        }

        debug!(prefix = %prefix, start, "Invoice sequence resumed");
        Ok(InvoiceSequencer {
            prefix,
            next: AtomicU64::new(start),
            issued: AtomicU64::new(0),
        })
    }

    pub fn prefix(&self) -> &InvoicePrefix {
        &self.prefix
    }

    /// Allocates the next invoice number.
    ///
    /// ## Errors
    /// `SequenceExhausted` once `999999999` has been issued; the counter
    /// stays put rather than wrapping.
    pub fn next_number(&self) -> StoreResult<String> {
        let value = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n <= MAX_SEQUENCE).then_some(n + 1)
            })
            .map_err(|_| {
                warn!(prefix = %self.prefix, max = MAX_SEQUENCE, "Invoice sequence exhausted");
                StoreError::SequenceExhausted { max: MAX_SEQUENCE }
            })?;

        self.issued.fetch_add(1, Ordering::Relaxed);
        debug!(value, "Invoice number allocated");
        Ok(self.prefix.format(value))
    }

    /// The number the next allocation would return, without consuming it.
    pub fn preview(&self) -> StoreResult<String> {
        let value = self.next.load(Ordering::SeqCst);
        if value > MAX_SEQUENCE {
            return Err(StoreError::SequenceExhausted { max: MAX_SEQUENCE });
        }
        Ok(self.prefix.format(value))
    }

    /// Counter value of the next allocation.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    /// How many numbers this sequencer has handed out.
    pub fn allocated(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Restarts the counter at 1.
    ///
    /// Previously issued numbers will be issued again; only call this when
    /// the invoices they belong to are gone as well (tests, a fresh day
    /// book on a new document type).
    pub fn reset(&self) {
        warn!(prefix = %self.prefix, "Invoice sequence reset to 1");
        self.next.store(1, Ordering::SeqCst);
        self.issued.store(0, Ordering::Relaxed);
    }
}

impl Default for InvoiceSequencer {
    fn default() -> Self {
        InvoiceSequencer::new(InvoicePrefix::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_first_number_format() {
        let seq = InvoiceSequencer::default();
        assert_eq!(seq.next_number().unwrap(), "001-001-01-000000001");
        assert_eq!(seq.next_number().unwrap(), "001-001-01-000000002");
    }

    #[test]
    fn test_sequential_numbers_have_no_gaps() {
        let seq = InvoiceSequencer::default();
        let numbers: Vec<String> = (0..100).map(|_| seq.next_number().unwrap()).collect();

        for (i, number) in numbers.iter().enumerate() {
            assert_eq!(number, &format!("001-001-01-{:09}", i + 1));
        }
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seq.allocated(), 100);
    }

    #[test]
    fn test_preview_does_not_consume() {
        let seq = InvoiceSequencer::default();
        assert_eq!(seq.preview().unwrap(), "001-001-01-000000001");
        assert_eq!(seq.preview().unwrap(), "001-001-01-000000001");
        assert_eq!(seq.next_number().unwrap(), "001-001-01-000000001");
        assert_eq!(seq.preview().unwrap(), "001-001-01-000000002");
    }

    #[test]
    fn test_starting_at_resumes() {
        let seq = InvoiceSequencer::starting_at(InvoicePrefix::default(), 42).unwrap();
        assert_eq!(seq.next_number().unwrap(), "001-001-01-000000042");
        assert_eq!(seq.allocated(), 1);

        assert!(InvoiceSequencer::starting_at(InvoicePrefix::default(), 0).is_err());
        assert!(InvoiceSequencer::starting_at(InvoicePrefix::default(), MAX_SEQUENCE + 1).is_err());
    }

    #[test]
    fn test_exhaustion_does_not_wrap() {
        let seq = InvoiceSequencer::starting_at(InvoicePrefix::default(), MAX_SEQUENCE).unwrap();
        assert_eq!(seq.next_number().unwrap(), "001-001-01-999999999");

        assert!(matches!(
            seq.next_number(),
            Err(StoreError::SequenceExhausted { .. })
        ));
        assert!(matches!(seq.preview(), Err(StoreError::SequenceExhausted { .. })));
        assert_eq!(seq.allocated(), 1);
    }

    #[test]
    fn test_reset() {
        let seq = InvoiceSequencer::default();
        seq.next_number().unwrap();
        seq.next_number().unwrap();
        seq.reset();
        assert_eq!(seq.allocated(), 0);
        assert_eq!(seq.next_number().unwrap(), "001-001-01-000000001");
    }

    #[test]
    fn test_custom_prefix() {
        let prefix: InvoicePrefix = "002-010-03".parse().unwrap();
        assert_eq!(prefix.branch(), "002");
        assert_eq!(prefix.pos(), "010");
        assert_eq!(prefix.doc_type(), "03");

        let seq = InvoiceSequencer::new(prefix);
        assert_eq!(seq.next_number().unwrap(), "002-010-03-000000001");
    }

    #[test]
    fn test_prefix_validation() {
        assert!("001-001".parse::<InvoicePrefix>().is_err());
        assert!("01-001-01".parse::<InvoicePrefix>().is_err());
        assert!("001-001-1".parse::<InvoicePrefix>().is_err());
        assert!("00A-001-01".parse::<InvoicePrefix>().is_err());
        assert!(InvoicePrefix::new("001", "001", "01").is_ok());
    }

    #[test]
    fn test_prefix_serde_as_string() {
        let prefix = InvoicePrefix::default();
        assert_eq!(serde_json::to_string(&prefix).unwrap(), "\"001-001-01\"");
        assert!(serde_json::from_str::<InvoicePrefix>("\"1-1-1\"").is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_get_distinct_numbers() {
        let seq = Arc::new(InvoiceSequencer::default());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let seq = Arc::clone(&seq);
            handles.push(tokio::spawn(async move {
                (0..250)
                    .map(|_| seq.next_number().unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for number in handle.await.unwrap() {
                assert!(all.insert(number), "duplicate invoice number");
            }
        }

        assert_eq!(all.len(), 4000);
        assert_eq!(seq.allocated(), 4000);
        assert_eq!(seq.preview().unwrap(), "001-001-01-000004001");
    }
}
