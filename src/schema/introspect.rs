use crate::connection::ColumnDescription;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::table::{Column, ColumnType};
use crate::types::to_column_type;

/// Resolve the tabular columns of a live table from its declared schema.
///
/// Columns keep their declared order. The first column whose type has no tabular
/// counterpart aborts the whole introspection.
pub fn introspect(description: &[ColumnDescription], dialect: Dialect) -> Result<Vec<Column>> {
    description
        .iter()
        .map(|column| {
            let column_type = if column.native_interval {
                ColumnType::TimeInterval
            } else {
                to_column_type(&column.type_name, dialect)
                    .map_err(|e| e.with_column(&column.name))?
            };
            Ok(Column::new(column.name.clone(), column_type))
        })
        .collect()
}
