//! Test stores — `TableStore` implementations for error-path tests.

use std::sync::Arc;

use async_trait::async_trait;
use twotruths_core::error::GameError;
use twotruths_core::store::{TableRecord, TableStore};

/// A table store that always returns a store error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingTableStore;

fn connection_refused() -> GameError {
    GameError::Store("connection refused".into())
}

#[async_trait]
impl TableStore for FailingTableStore {
    async fn get(
        &self,
        _partition_key: &str,
        _row_key: &str,
    ) -> Result<Option<TableRecord>, GameError> {
        Err(connection_refused())
    }

    async fn upsert(&self, _record: TableRecord) -> Result<(), GameError> {
        Err(connection_refused())
    }

    async fn delete(&self, _partition_key: &str, _row_key: &str) -> Result<(), GameError> {
        Err(connection_refused())
    }

    async fn scan_partition(&self, _partition_key: &str) -> Result<Vec<TableRecord>, GameError> {
        Err(connection_refused())
    }

    async fn scan_prefix(
        &self,
        _partition_key: &str,
        _key_prefix: &str,
    ) -> Result<Vec<TableRecord>, GameError> {
        Err(connection_refused())
    }

    async fn scan_row_key(&self, _row_key: &str) -> Result<Vec<TableRecord>, GameError> {
        Err(connection_refused())
    }
}

/// A table store that delegates to an inner store but fails `delete`
/// for a configured set of row keys. Useful for exercising partial
/// failure during whole-session sweeps.
pub struct FlakyTableStore {
    inner: Arc<dyn TableStore>,
    failing_row_keys: Vec<String>,
}

impl FlakyTableStore {
    /// Create a flaky store that fails deletes for `failing_row_keys`.
    #[must_use]
    pub fn new(inner: Arc<dyn TableStore>, failing_row_keys: Vec<String>) -> Self {
        Self {
            inner,
            failing_row_keys,
        }
    }
}

#[async_trait]
impl TableStore for FlakyTableStore {
    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRecord>, GameError> {
        self.inner.get(partition_key, row_key).await
    }

    async fn upsert(&self, record: TableRecord) -> Result<(), GameError> {
        self.inner.upsert(record).await
    }

    async fn delete(&self, partition_key: &str, row_key: &str) -> Result<(), GameError> {
        if self.failing_row_keys.iter().any(|k| k == row_key) {
            return Err(GameError::Store(format!(
                "delete rejected for {partition_key}/{row_key}"
            )));
        }
        self.inner.delete(partition_key, row_key).await
    }

    async fn scan_partition(&self, partition_key: &str) -> Result<Vec<TableRecord>, GameError> {
        self.inner.scan_partition(partition_key).await
    }

    async fn scan_prefix(
        &self,
        partition_key: &str,
        key_prefix: &str,
    ) -> Result<Vec<TableRecord>, GameError> {
        self.inner.scan_prefix(partition_key, key_prefix).await
    }

    async fn scan_row_key(&self, row_key: &str) -> Result<Vec<TableRecord>, GameError> {
        self.inner.scan_row_key(row_key).await
    }
}
