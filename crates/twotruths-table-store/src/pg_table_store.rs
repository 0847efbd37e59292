//! `PostgreSQL` implementation of the `TableStore` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use twotruths_core::error::GameError;
use twotruths_core::store::{TableRecord, TableStore};

use crate::schema;

/// PostgreSQL-backed table store over a single `game_records` table.
#[derive(Debug, Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    /// Creates a new `PgTableStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the records table and index if they are absent.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the schema statements fail.
    pub async fn ensure_schema(&self) -> Result<(), GameError> {
        sqlx::raw_sql(schema::CREATE_GAME_RECORDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        tracing::debug!("game_records schema ensured");
        Ok(())
    }
}

fn store_error(err: sqlx::Error) -> GameError {
    GameError::Store(err.to_string())
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> TableRecord {
    TableRecord {
        partition_key: row.get("partition_key"),
        row_key: row.get("row_key"),
        body: row.get("body"),
    }
}

/// Lexicographic upper bound for a row-key prefix scan: the last byte
/// of the prefix bumped by one, so `"st:"` scans `>= "st:" AND < "st;"`.
/// Returns `None` when no finite upper bound exists; prefixes used by
/// the key scheme are short ASCII markers.
pub(crate) fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut bytes = prefix.as_bytes().to_vec();
    let last = bytes.last_mut()?;
    if !last.is_ascii() || *last == 0x7F {
        return None;
    }
    *last += 1;
    String::from_utf8(bytes).ok()
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<TableRecord>, GameError> {
        let row = sqlx::query(
            "SELECT partition_key, row_key, body FROM game_records
             WHERE partition_key = $1 AND row_key = $2",
        )
        .bind(partition_key)
        .bind(row_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn upsert(&self, record: TableRecord) -> Result<(), GameError> {
        sqlx::query(
            "INSERT INTO game_records (partition_key, row_key, body)
             VALUES ($1, $2, $3)
             ON CONFLICT (partition_key, row_key)
             DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()",
        )
        .bind(&record.partition_key)
        .bind(&record.row_key)
        .bind(&record.body)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn delete(&self, partition_key: &str, row_key: &str) -> Result<(), GameError> {
        let result = sqlx::query(
            "DELETE FROM game_records WHERE partition_key = $1 AND row_key = $2",
        )
        .bind(partition_key)
        .bind(row_key)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(GameError::NotFound(format!(
                "record {partition_key}/{row_key}"
            )));
        }
        Ok(())
    }

    async fn scan_partition(&self, partition_key: &str) -> Result<Vec<TableRecord>, GameError> {
        let rows = sqlx::query(
            "SELECT partition_key, row_key, body FROM game_records
             WHERE partition_key = $1
             ORDER BY row_key",
        )
        .bind(partition_key)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn scan_prefix(
        &self,
        partition_key: &str,
        key_prefix: &str,
    ) -> Result<Vec<TableRecord>, GameError> {
        let rows = match prefix_upper_bound(key_prefix) {
            Some(upper) => {
                sqlx::query(
                    "SELECT partition_key, row_key, body FROM game_records
                     WHERE partition_key = $1 AND row_key >= $2 AND row_key < $3
                     ORDER BY row_key",
                )
                .bind(partition_key)
                .bind(key_prefix)
                .bind(upper)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT partition_key, row_key, body FROM game_records
                     WHERE partition_key = $1 AND row_key >= $2
                     ORDER BY row_key",
                )
                .bind(partition_key)
                .bind(key_prefix)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_error)?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn scan_row_key(&self, row_key: &str) -> Result<Vec<TableRecord>, GameError> {
        let rows = sqlx::query(
            "SELECT partition_key, row_key, body FROM game_records
             WHERE row_key = $1
             ORDER BY partition_key",
        )
        .bind(row_key)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.iter().map(record_from_row).collect())
    }
}
