//! Game records database schema.

/// SQL to create the records table.
///
/// `IF NOT EXISTS` makes initialization idempotent; re-running it
/// against an existing table is a no-op rather than an error.
pub const CREATE_GAME_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS game_records (
    partition_key TEXT NOT NULL,
    row_key       TEXT NOT NULL,
    body          JSONB NOT NULL,
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (partition_key, row_key)
);

CREATE INDEX IF NOT EXISTS idx_game_records_row_key
    ON game_records (row_key);
";
