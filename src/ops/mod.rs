/// Converting driver result sets into tables.
mod materialize;
/// Running SQL against staged copies of tables and against live databases.
pub mod query;
/// Reading live tables.
pub mod read;
/// Creating tables and inserting rows in batches.
pub mod write;

pub use query::{query, query_external, DEFAULT_STAGING_TABLE};
pub use read::{from_sql, ReadOptions};
pub use write::{to_sql, write, CreateMode, WriteOptions};
