use serde::Deserialize;
use tracing::debug;

use crate::connection::{with_connection, Connection, Target};
use crate::error::{Error, Result};
use crate::schema::{build_table_spec, SchemaOptions, SqlTableSpec};
use crate::table::{Row, Table};

/// What happens to the target table before rows are inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// Assume the table exists.
    Skip,
    /// Create the table; fail if it already exists.
    #[default]
    Create,
    /// Create the table unless it already exists, then reuse it.
    CreateIfNotExists,
    /// Drop any existing table of the same name, then create it.
    Overwrite,
}

/// How a table is written to a database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Table creation behavior.
    pub create: CreateMode,
    /// Insert the rows after creation.
    pub insert: bool,
    /// Rows per insert batch; `None` inserts everything in one batch.
    pub chunk_size: Option<usize>,
    /// Keywords placed between `INSERT` and `INTO`, e.g. `OR REPLACE`.
    pub insert_prefixes: Vec<String>,
    /// How the table definition is derived.
    pub schema: SchemaOptions,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create: CreateMode::Create,
            insert: true,
            chunk_size: None,
            insert_prefixes: Vec::new(),
            schema: SchemaOptions::default(),
        }
    }
}

/// Create `spec`'s table as `options.create` asks and insert `rows` in order.
///
/// Each batch of `options.chunk_size` rows is one bulk insert. Batches are not
/// wrapped in a shared transaction: when a later batch fails, earlier batches
/// stay in the table. Returns the number of rows inserted.
pub fn write(
    connection: &mut dyn Connection,
    spec: &SqlTableSpec,
    rows: &[Row],
    options: &WriteOptions,
) -> Result<u64> {
    if options.chunk_size == Some(0) {
        return Err(Error::InvalidOption(
            "chunk_size must be at least 1".to_string(),
        ));
    }

    create_table(connection, spec, options.create)?;

    if !options.insert || rows.is_empty() {
        return Ok(0);
    }

    let statement = spec.insert_statement(&options.insert_prefixes, connection.param_style());
    let chunk_size = options.chunk_size.unwrap_or(rows.len());
    let mut inserted = 0;
    for (batch, chunk) in rows.chunks(chunk_size).enumerate() {
        inserted += connection.insert_batch(&statement, chunk)?;
        debug!(table = %spec.name, batch, rows = chunk.len(), "inserted batch");
    }
    Ok(inserted)
}

fn create_table(
    connection: &mut dyn Connection,
    spec: &SqlTableSpec,
    mode: CreateMode,
) -> Result<()> {
    let caps = spec.dialect.capabilities();
    let schema = spec.schema.as_deref();

    let if_not_exists = match mode {
        CreateMode::Skip => return Ok(()),
        CreateMode::Create => false,
        CreateMode::CreateIfNotExists if caps.supports_if_not_exists => true,
        CreateMode::CreateIfNotExists => {
            // Check-then-create; a concurrent creator can still win the race.
            if connection.table_exists(schema, &spec.name)? {
                debug!(table = %spec.name, "table exists, reusing it");
                return Ok(());
            }
            false
        }
        CreateMode::Overwrite => {
            if caps.supports_if_exists {
                connection.execute(&spec.drop_statement(true))?;
            } else if connection.table_exists(schema, &spec.name)? {
                connection.execute(&spec.drop_statement(false))?;
            }
            false
        }
    };

    let ddl = spec.create_statement(if_not_exists);
    debug!(table = %spec.name, %ddl, "creating table");
    connection.execute(&ddl)?;
    Ok(())
}

/// Write `table` to `target` as `table_name`, returning the definition used.
///
/// The definition is built for the connection's dialect from `options.schema`.
pub fn to_sql<'c>(
    table: &Table,
    target: impl Into<Target<'c>>,
    table_name: &str,
    options: &WriteOptions,
) -> Result<SqlTableSpec> {
    with_connection(target.into(), |connection| {
        let spec = build_table_spec(table, table_name, connection.dialect(), &options.schema)?;
        write(connection, &spec, table.rows(), options)?;
        Ok(spec)
    })
}
