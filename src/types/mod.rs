/// Bidirectional mapping between tabular column types and SQL column types.
pub mod mapping;

pub use mapping::{to_column_type, to_sql_type, SqlType};
