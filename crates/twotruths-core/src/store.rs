//! Partitioned table store abstraction.
//!
//! All game state lives in one logical table of records addressed by
//! `(partition_key, row_key)`. The store is the sole shared mutable
//! resource: point operations are individually atomic with
//! last-writer-wins semantics, and there are no cross-record
//! transactions.

use async_trait::async_trait;

use crate::error::GameError;

/// A single stored record, identified by partition key and row key.
///
/// The body is an opaque JSON document from the store's point of
/// view; callers tag it with a `kind` discriminant and decode it on
/// read rather than parsing structure out of the row key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    /// Grouping key; all records of one session share a partition.
    pub partition_key: String,
    /// Identifier unique within the partition.
    pub row_key: String,
    /// Tagged record payload.
    pub body: serde_json::Value,
}

/// Contract for a partitioned key-value table store.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Point lookup. Returns `None` when no record exists under the key.
    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRecord>, GameError>;

    /// Insert or overwrite a single record (last-writer-wins).
    async fn upsert(&self, record: TableRecord) -> Result<(), GameError>;

    /// Delete a single record.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotFound` when no record exists under the key.
    async fn delete(&self, partition_key: &str, row_key: &str) -> Result<(), GameError>;

    /// Return every record in a partition, in row-key order.
    async fn scan_partition(&self, partition_key: &str) -> Result<Vec<TableRecord>, GameError>;

    /// Return the records in a partition whose row key starts with
    /// `key_prefix`, in row-key order.
    async fn scan_prefix(
        &self,
        partition_key: &str,
        key_prefix: &str,
    ) -> Result<Vec<TableRecord>, GameError>;

    /// Return the records carrying exactly `row_key` across all
    /// partitions. Used to enumerate session meta records.
    async fn scan_row_key(&self, row_key: &str) -> Result<Vec<TableRecord>, GameError>;
}
