mod support;

use agate_sql::connection::ColumnDescription;
use agate_sql::ops::{self, CreateMode, ReadOptions, WriteOptions};
use agate_sql::schema::{build_table_spec, introspect, SchemaOptions};
use agate_sql::{ColumnType, Dialect, SqliteConnection, Table, TableSqlExt, Value};
use proptest::prelude::*;
use rust_decimal::Decimal;

use support::{id_name_table, memory_connection, number, sample_table, SAMPLE_COLUMNS};

#[test]
fn back_and_forth() {
    let table = sample_table();
    let mut conn = memory_connection();

    table
        .to_sql(&mut conn, "test", &WriteOptions::default())
        .expect("table should be written");
    let read = Table::from_sql(&mut conn, "test", &ReadOptions::default())
        .expect("table should be read back");

    assert_eq!(read.column_names(), SAMPLE_COLUMNS.to_vec());
    assert_eq!(read.column_types(), table.column_types());
    assert_eq!(read.row_count(), table.row_count());
    assert_eq!(read.rows()[0], table.rows()[0]);
    assert_eq!(read.rows(), table.rows());
}

#[test]
fn keyword_named_columns_round_trip() {
    let table = Table::new(
        vec!["current_date".into(), "transaction".into(), "collate".into()],
        vec![ColumnType::Text, ColumnType::Text, ColumnType::Number],
        vec![vec!["x".into(), "t1".into(), number("3")]],
    )
    .expect("valid table");
    let mut conn = memory_connection();

    table
        .to_sql(&mut conn, "kw", &WriteOptions::default())
        .expect("table should be written");
    let read = Table::from_sql(&mut conn, "kw", &ReadOptions::default())
        .expect("table should be read back");

    assert_eq!(read.column_names(), vec!["current_date", "transaction", "collate"]);
    assert_eq!(read.rows(), table.rows());
    assert_eq!(read.rows()[0][0].as_str(), Some("x"));
}

#[test]
fn wrapped_rusqlite_connection_sees_written_rows() {
    let raw = rusqlite::Connection::open_in_memory().expect("in-memory sqlite should open");
    let mut conn = SqliteConnection::from_rusqlite(raw);

    sample_table()
        .to_sql(&mut conn, "sample", &WriteOptions::default())
        .expect("table should be written");
    let count: i64 = conn
        .inner()
        .query_row("SELECT count(*) FROM sample", [], |row| row.get(0))
        .expect("count runs");
    assert_eq!(count, 4);
}

#[test]
fn create_if_not_exists_appends_to_existing_table() {
    let first = id_name_table(&[(1, "Jake"), (2, "Howard")]);
    let second = id_name_table(&[(3, "Liz"), (4, "Tim")]);
    let mut conn = memory_connection();
    let options = WriteOptions {
        create: CreateMode::CreateIfNotExists,
        ..WriteOptions::default()
    };

    first
        .to_sql(&mut conn, "create_if_not_exists_test", &options)
        .expect("first write creates the table");
    second
        .to_sql(&mut conn, "create_if_not_exists_test", &options)
        .expect("second write reuses the table");

    let read = Table::from_sql(&mut conn, "create_if_not_exists_test", &ReadOptions::default())
        .expect("table should be read back");
    assert_eq!(read.column_names(), vec!["id", "name"]);
    assert_eq!(read.column_types(), vec![ColumnType::Number, ColumnType::Text]);
    assert_eq!(read.row_count(), 4);
    assert_eq!(read.rows()[0], first.rows()[0]);
    assert_eq!(read.rows()[3], second.rows()[1]);
}

#[test]
fn plain_create_fails_when_table_exists() {
    let table = id_name_table(&[(1, "Jake")]);
    let mut conn = memory_connection();

    table
        .to_sql(&mut conn, "once", &WriteOptions::default())
        .expect("first write creates the table");
    let err = table
        .to_sql(&mut conn, "once", &WriteOptions::default())
        .expect_err("second create should fail");
    assert!(matches!(err, agate_sql::Error::Database(_)), "{err}");
}

#[test]
fn overwrite_replaces_existing_rows() {
    let mut conn = memory_connection();
    let options = WriteOptions {
        create: CreateMode::Overwrite,
        ..WriteOptions::default()
    };

    id_name_table(&[(1, "Jake"), (2, "Howard")])
        .to_sql(&mut conn, "people", &options)
        .expect("first write");
    id_name_table(&[(3, "Liz")])
        .to_sql(&mut conn, "people", &options)
        .expect("overwrite");

    let read = Table::from_sql(&mut conn, "people", &ReadOptions::default()).expect("read back");
    assert_eq!(read.rows(), &[vec![number("3"), Value::from("Liz")]]);
}

#[test]
fn chunked_inserts_keep_every_row() {
    let rows: Vec<Vec<Value>> = (0..9999_i64).map(|n| vec![Value::from(n)]).collect();
    let expected: Decimal = (0..9999_i64).map(Decimal::from).sum();
    let table = Table::new(vec!["number".into()], vec![ColumnType::Number], rows)
        .expect("valid table");
    let mut conn = memory_connection();

    for chunk_size in [9, 11, 100, 231] {
        let options = WriteOptions {
            create: CreateMode::Overwrite,
            chunk_size: Some(chunk_size),
            ..WriteOptions::default()
        };
        table
            .to_sql(&mut conn, "test_chunk_size", &options)
            .unwrap_or_else(|e| panic!("chunk size {chunk_size}: {e}"));

        let read = Table::from_sql(&mut conn, "test_chunk_size", &ReadOptions::default())
            .expect("table should be read back");
        let actual: Decimal = read.column_values(0).filter_map(Value::as_number).sum();
        assert_eq!(read.row_count(), 9999, "chunk size {chunk_size}");
        assert_eq!(actual, expected, "chunk size {chunk_size}");
    }
}

#[test]
fn row_limit_reads_leading_rows() {
    let table = sample_table();
    let mut conn = memory_connection();
    table
        .to_sql(&mut conn, "limited", &WriteOptions::default())
        .expect("table should be written");

    let options = ReadOptions {
        row_limit: Some(2),
        ..ReadOptions::default()
    };
    let read = Table::from_sql(&mut conn, "limited", &options).expect("read back");
    assert_eq!(read.rows(), &table.rows()[..2]);
}

#[test]
fn locator_targets_open_and_close_their_own_connection() {
    let dir = tempfile::tempdir().expect("temp dir");
    let locator = format!("sqlite:///{}", dir.path().join("data.db").display());
    let table = sample_table();

    ops::to_sql(&table, locator.as_str(), "sample", &WriteOptions::default())
        .expect("write through locator");
    let read = ops::from_sql(locator.as_str(), "sample", &ReadOptions::default())
        .expect("read through locator");
    assert_eq!(read.rows(), table.rows());
}

#[test]
fn reading_a_missing_table_fails() {
    let mut conn = memory_connection();
    let err = Table::from_sql(&mut conn, "nope", &ReadOptions::default())
        .expect_err("missing table");
    assert!(matches!(err, agate_sql::Error::TableNotFound(name) if name == "nope"));
}

fn column_types_strategy() -> impl Strategy<Value = Vec<ColumnType>> {
    prop::collection::vec(prop::sample::select(ColumnType::ALL.to_vec()), 1..7)
}

fn empty_table(types: &[ColumnType]) -> Table {
    Table::new(
        (0..types.len()).map(|i| format!("c{i}")).collect(),
        types.to_vec(),
        Vec::new(),
    )
    .expect("valid table")
}

proptest! {
    #[test]
    fn declared_types_round_trip_through_introspection(
        types in column_types_strategy(),
        dialect in prop::sample::select(vec![
            Dialect::Generic,
            Dialect::Sqlite,
            Dialect::Postgresql,
            Dialect::Crate,
            Dialect::Ingres,
        ]),
        constraints in any::<bool>(),
    ) {
        let table = empty_table(&types);
        let options = SchemaOptions { constraints, ..SchemaOptions::default() };
        let spec = build_table_spec(&table, "t", dialect, &options).expect("spec builds");

        let description: Vec<ColumnDescription> = spec
            .columns
            .iter()
            .map(|c| ColumnDescription::new(c.name.clone(), c.sql_type.render(dialect)))
            .collect();
        let columns = introspect(&description, dialect).expect("schema resolves");
        let resolved: Vec<ColumnType> = columns.iter().map(|c| c.column_type).collect();
        prop_assert_eq!(resolved, types);
    }

    #[test]
    fn live_sqlite_tables_keep_their_types(types in column_types_strategy()) {
        let table = empty_table(&types);
        let mut conn = memory_connection();
        table.to_sql(&mut conn, "t", &WriteOptions::default()).expect("table written");
        let read = Table::from_sql(&mut conn, "t", &ReadOptions::default()).expect("table read");
        prop_assert_eq!(read.column_types(), types);
    }
}
