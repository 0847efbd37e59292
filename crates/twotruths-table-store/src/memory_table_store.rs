//! In-memory implementation of the `TableStore` trait.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use twotruths_core::error::GameError;
use twotruths_core::store::{TableRecord, TableStore};

type Partition = BTreeMap<String, serde_json::Value>;

/// Embedded table store over ordered maps. Row keys within a
/// partition iterate in lexicographic order, which gives prefix scans
/// the same semantics as the `PostgreSQL` range queries.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    partitions: Mutex<BTreeMap<String, Partition>>,
}

impl MemoryTableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_partitions<T>(&self, f: impl FnOnce(&mut BTreeMap<String, Partition>) -> T) -> T {
        let mut guard = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

fn record(partition_key: &str, row_key: &str, body: &serde_json::Value) -> TableRecord {
    TableRecord {
        partition_key: partition_key.to_owned(),
        row_key: row_key.to_owned(),
        body: body.clone(),
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRecord>, GameError> {
        Ok(self.with_partitions(|partitions| {
            partitions
                .get(partition_key)
                .and_then(|p| p.get(row_key))
                .map(|body| record(partition_key, row_key, body))
        }))
    }

    async fn upsert(&self, rec: TableRecord) -> Result<(), GameError> {
        self.with_partitions(|partitions| {
            partitions
                .entry(rec.partition_key)
                .or_default()
                .insert(rec.row_key, rec.body);
        });
        Ok(())
    }

    async fn delete(&self, partition_key: &str, row_key: &str) -> Result<(), GameError> {
        let removed = self.with_partitions(|partitions| {
            partitions
                .get_mut(partition_key)
                .and_then(|p| p.remove(row_key))
        });
        match removed {
            Some(_) => Ok(()),
            None => Err(GameError::NotFound(format!(
                "record {partition_key}/{row_key}"
            ))),
        }
    }

    async fn scan_partition(&self, partition_key: &str) -> Result<Vec<TableRecord>, GameError> {
        Ok(self.with_partitions(|partitions| {
            partitions
                .get(partition_key)
                .map(|p| {
                    p.iter()
                        .map(|(row_key, body)| record(partition_key, row_key, body))
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn scan_prefix(
        &self,
        partition_key: &str,
        key_prefix: &str,
    ) -> Result<Vec<TableRecord>, GameError> {
        Ok(self.with_partitions(|partitions| {
            partitions
                .get(partition_key)
                .map(|p| {
                    p.range(key_prefix.to_owned()..)
                        .take_while(|(row_key, _)| row_key.starts_with(key_prefix))
                        .map(|(row_key, body)| record(partition_key, row_key, body))
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn scan_row_key(&self, row_key: &str) -> Result<Vec<TableRecord>, GameError> {
        Ok(self.with_partitions(|partitions| {
            partitions
                .iter()
                .filter_map(|(partition_key, p)| {
                    p.get(row_key).map(|body| record(partition_key, row_key, body))
                })
                .collect()
        }))
    }
}
