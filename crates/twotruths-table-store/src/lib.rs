//! Table store implementations for the Two Truths and a Lie backend.
//!
//! [`PgTableStore`] is the production store, one `game_records` table
//! in PostgreSQL. [`MemoryTableStore`] is an embedded ordered-map
//! store with identical semantics, used by the demo CLI and by tests
//! that must run without a database.

pub mod memory_table_store;
pub mod pg_table_store;
pub mod schema;

pub use memory_table_store::MemoryTableStore;
pub use pg_table_store::PgTableStore;
