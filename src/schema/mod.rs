/// Building SQL table definitions from tabular tables.
pub mod builder;
/// Resolving tabular columns from a live table's declared schema.
pub mod introspect;
/// SQL table definitions and the statements rendered from them.
pub mod spec;

pub use builder::{build_table_spec, create_statement, SchemaOptions};
pub use introspect::introspect;
pub use spec::{SqlColumnSpec, SqlTableSpec};
