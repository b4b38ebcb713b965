//! The record store abstraction.

use crate::models::Record;
use crate::query::{ListQuery, SymbolFilter};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// One page of records plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    /// Records on the page, in sort order.
    pub records: Vec<Record>,
    /// Total records matching the filter.
    pub total: u64,
}

/// Store failure.
///
/// The `Display` output carries backend detail for logs; clients only ever see
/// [`StoreError::public_message`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Listing query failed.
    #[error("failed to find documents: {0}")]
    Find(String),

    /// Count query failed.
    #[error("failed to count documents: {0}")]
    Count(String),

    /// Distinct query failed.
    #[error("failed to get distinct symbols: {0}")]
    Distinct(String),

    /// Connecting to the store failed.
    #[error("failed to connect to store: {0}")]
    Connect(String),

    /// Operation exceeded its deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Message safe to return to API clients.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Find(_) => "Failed to find documents",
            Self::Count(_) => "Failed to count documents",
            Self::Distinct(_) => "Failed to get distinct symbols",
            Self::Connect(_) => "Store unavailable",
            Self::Timeout(_) => "Store operation timed out",
        }
    }
}

/// Read-only access to prediction records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns one sorted, paginated page and the total count for its filter.
    ///
    /// The page and the count are separate queries and may observe different
    /// snapshots under concurrent external writes.
    async fn list(&self, query: &ListQuery) -> Result<RecordPage, StoreError>;

    /// Returns the unique `Symbol` values matching `filter`, in store order.
    async fn distinct_symbols(&self, filter: &SymbolFilter) -> Result<Vec<String>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
