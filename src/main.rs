//! CLI entry point for `agate-sql`.

use std::process;

use agate_sql::ops::{self, CreateMode, ReadOptions, WriteOptions};
use agate_sql::parser::names::split_schema_and_relation;
use agate_sql::schema::{self, SchemaOptions};
use agate_sql::{Dialect, Table};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agate-sql",
    about = "Move tables between SQL databases and inspect their schemas"
)]
struct Cli {
    /// Print debug diagnostics on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the CREATE TABLE statement a live table needs in another dialect
    Schema {
        /// Database locator, e.g. sqlite:///data.db
        locator: String,
        /// Table to read, optionally qualified as schema.table
        table: String,
        /// Dialect to render the statement for
        #[arg(long, default_value = "generic")]
        dialect: Dialect,
        /// Schema to qualify the printed table name with
        #[arg(long)]
        db_schema: Option<String>,
        /// Do not infer NOT NULL markers and text lengths
        #[arg(long)]
        no_constraints: bool,
        /// Column of a UNIQUE constraint (repeatable)
        #[arg(long = "unique")]
        unique: Vec<String>,
        /// Smallest length of a bounded text column
        #[arg(long, default_value_t = 1)]
        min_col_len: u64,
        /// Factor applied to the longest observed text value
        #[arg(long, default_value_t = 1.0)]
        col_len_multiplier: f64,
    },
    /// Run a query and print the result
    Query {
        /// Database locator
        locator: String,
        /// SQL query
        sql: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tsv)]
        format: Format,
    },
    /// Copy a table from one database to another
    Copy {
        /// Source database locator
        source: String,
        /// Table to copy, optionally qualified as schema.table
        table: String,
        /// Destination database locator
        dest: String,
        /// Name of the destination table (defaults to TABLE)
        #[arg(long)]
        dest_table: Option<String>,
        /// Drop the destination table first if it exists
        #[arg(long, conflicts_with = "if_not_exists")]
        overwrite: bool,
        /// Append to the destination table if it already exists
        #[arg(long)]
        if_not_exists: bool,
        /// Rows per insert batch
        #[arg(long)]
        chunk_size: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Tsv,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "agate_sql=debug"
    } else {
        "agate_sql=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}

fn run(command: Command) -> agate_sql::Result<()> {
    match command {
        Command::Schema {
            locator,
            table,
            dialect,
            db_schema,
            no_constraints,
            unique,
            min_col_len,
            col_len_multiplier,
        } => {
            let data = ops::from_sql(locator, &table, &ReadOptions::default())?;
            let (_, name) = split_schema_and_relation(&table);
            let options = SchemaOptions {
                db_schema,
                constraints: !no_constraints,
                unique_constraint: unique,
                min_col_len,
                col_len_multiplier,
                prefixes: Vec::new(),
            };
            println!(
                "{}",
                schema::create_statement(&data, &name, dialect, &options)?
            );
        }
        Command::Query {
            locator,
            sql,
            format,
        } => {
            let result = ops::query_external(locator, &sql)?;
            print_table(&result, format)?;
        }
        Command::Copy {
            source,
            table,
            dest,
            dest_table,
            overwrite,
            if_not_exists,
            chunk_size,
        } => {
            let data = ops::from_sql(source, &table, &ReadOptions::default())?;
            let create = if overwrite {
                CreateMode::Overwrite
            } else if if_not_exists {
                CreateMode::CreateIfNotExists
            } else {
                CreateMode::Create
            };
            let options = WriteOptions {
                create,
                chunk_size,
                ..WriteOptions::default()
            };
            let name = dest_table.unwrap_or_else(|| split_schema_and_relation(&table).1);
            ops::to_sql(&data, dest, &name, &options)?;
            eprintln!("Copied {} rows into {name}", data.row_count());
        }
    }
    Ok(())
}

fn print_table(table: &Table, format: Format) -> agate_sql::Result<()> {
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(table)
                .map_err(|e| agate_sql::Error::InvalidTable(e.to_string()))?;
            println!("{json}");
        }
        Format::Tsv => {
            println!("{}", table.column_names().join("\t"));
            for row in table.rows() {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                println!("{}", cells.join("\t"));
            }
        }
    }
    Ok(())
}
