mod support;

use agate_sql::schema::SchemaOptions;
use agate_sql::{ColumnType, CreateMode, Error, ReadOptions, Table, TableSqlExt, Value, WriteOptions};

use support::{id_name_table, memory_connection, number, sample_table, SAMPLE_COLUMNS};

fn unique_on(columns: &[&str]) -> WriteOptions {
    WriteOptions {
        schema: SchemaOptions {
            unique_constraint: columns.iter().map(|c| c.to_string()).collect(),
            ..SchemaOptions::default()
        },
        ..WriteOptions::default()
    }
}

#[test]
fn duplicate_in_unique_column_is_a_constraint_violation() {
    let mut conn = memory_connection();
    let err = sample_table()
        .to_sql(&mut conn, "unique_constraint_test", &unique_on(&["number"]))
        .expect_err("rows 2 and 3 share a number");
    assert!(matches!(err, Error::ConstraintViolation(_)), "{err}");

    // The failing batch is rolled back as a unit.
    let read = Table::from_sql(&mut conn, "unique_constraint_test", &ReadOptions::default())
        .expect("table was created before the insert");
    assert_eq!(read.row_count(), 0);
}

#[test]
fn later_duplicate_row_is_not_stored() {
    let mut conn = memory_connection();
    id_name_table(&[(1, "Jake")])
        .to_sql(&mut conn, "people", &unique_on(&["id"]))
        .expect("first write");

    let append = WriteOptions {
        create: CreateMode::Skip,
        ..WriteOptions::default()
    };
    let err = id_name_table(&[(1, "Impostor")])
        .to_sql(&mut conn, "people", &append)
        .expect_err("duplicate id");
    assert!(matches!(err, Error::ConstraintViolation(_)), "{err}");

    let read = Table::from_sql(&mut conn, "people", &ReadOptions::default()).expect("read back");
    assert_eq!(read.rows(), &[vec![number("1"), Value::from("Jake")]]);
}

#[test]
fn earlier_batches_stay_committed() {
    let mut conn = memory_connection();
    let options = WriteOptions {
        chunk_size: Some(1),
        ..unique_on(&["id"])
    };
    let err = id_name_table(&[(1, "a"), (2, "b"), (1, "c"), (3, "d")])
        .to_sql(&mut conn, "partial", &options)
        .expect_err("third row collides");
    assert!(matches!(err, Error::ConstraintViolation(_)), "{err}");

    let read = Table::from_sql(&mut conn, "partial", &ReadOptions::default()).expect("read back");
    assert_eq!(read.row_count(), 2);
}

#[test]
fn insert_prefixes_replace_conflicting_rows() {
    let mut conn = memory_connection();
    let table = sample_table();
    let options = WriteOptions {
        insert_prefixes: vec!["OR REPLACE".into()],
        ..unique_on(&["number"])
    };
    table
        .to_sql(&mut conn, "prefixes_test", &options)
        .expect("conflicts are replaced");

    let read = Table::from_sql(&mut conn, "prefixes_test", &ReadOptions::default())
        .expect("read back");
    assert_eq!(read.column_names(), SAMPLE_COLUMNS.to_vec());
    assert_eq!(read.column_types(), table.column_types());
    assert_eq!(read.row_count(), table.row_count() - 1);
    assert_eq!(read.rows()[1], table.rows()[2]);
}

#[test]
fn null_in_not_null_column_is_a_constraint_violation() {
    let mut conn = memory_connection();
    id_name_table(&[(1, "Jake")])
        .to_sql(&mut conn, "people", &WriteOptions::default())
        .expect("first write");

    let with_null = Table::new(
        vec!["id".into(), "name".into()],
        vec![ColumnType::Number, ColumnType::Text],
        vec![vec![number("2"), Value::Null]],
    )
    .expect("valid table");
    let append = WriteOptions {
        create: CreateMode::Skip,
        ..WriteOptions::default()
    };
    let err = with_null
        .to_sql(&mut conn, "people", &append)
        .expect_err("name is NOT NULL");
    assert!(matches!(err, Error::ConstraintViolation(_)), "{err}");
}

#[test]
fn unknown_unique_column_is_rejected_before_touching_the_database() {
    let mut conn = memory_connection();
    let err = sample_table()
        .to_sql(&mut conn, "never", &unique_on(&["missing"]))
        .expect_err("no such column");
    assert!(matches!(err, Error::UnknownColumn(name) if name == "missing"));
    assert!(matches!(
        Table::from_sql(&mut conn, "never", &ReadOptions::default()),
        Err(Error::TableNotFound(_))
    ));
}
