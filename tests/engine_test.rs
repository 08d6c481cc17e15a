//! End-to-end tests: file bytes in, chart-ready rows out.

use chartable::{
    dataset_name_from_file, parse, run_query, unique_dataset_name, ChartQuery, Dataset,
    EngineError, FileKind, FilterClause, Value,
};
use std::path::PathBuf;

fn filter(column: &str, operator: &str, value: &str) -> FilterClause {
    FilterClause {
        column: column.to_string(),
        operator: operator.to_string(),
        value: value.to_string(),
    }
}

fn sales_dataset() -> Dataset {
    let csv = b"region,sales\neast,10\neast,20\nwest,5\n";
    let table = parse(csv, FileKind::Csv).unwrap();
    Dataset::from_table(1, "sales", table)
}

#[test]
fn csv_upload_to_dataset() {
    let ds = sales_dataset();
    assert_eq!(ds.columns, vec!["region", "sales"]);
    assert_eq!(ds.rows.len(), 3);
    assert_eq!(ds.rows[0]["region"], Value::Text("east".into()));
    assert_eq!(ds.rows[0]["sales"], Value::Integer(10));
}

#[test]
fn group_and_sum_over_uploaded_csv() {
    let ds = sales_dataset();
    let query = ChartQuery {
        dataset_id: ds.id,
        x_axis: "region".to_string(),
        y_axis: "sales".to_string(),
        aggregation: "sum".to_string(),
        group_by: vec!["region".to_string()],
        ..ChartQuery::default()
    };
    let out = run_query(&ds, &query);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["region"], Value::Text("east".into()));
    assert_eq!(out[0]["sales"], Value::Float(30.0));
    assert_eq!(out[1]["region"], Value::Text("west".into()));
    assert_eq!(out[1]["sales"], Value::Float(5.0));
    // x_axis is accepted but plays no part in the aggregated shape.
    assert_eq!(out[0].len(), 2);
}

#[test]
fn filter_then_pass_through() {
    let ds = sales_dataset();
    let query = ChartQuery {
        dataset_id: ds.id,
        filters: vec![filter("sales", "gt", "8")],
        ..ChartQuery::default()
    };
    let out = run_query(&ds, &query);
    assert_eq!(out.len(), 2);
    assert!(out
        .iter()
        .all(|row| row["region"] == Value::Text("east".into())));
    assert_eq!(out[0]["sales"], Value::Integer(10));
}

#[test]
fn global_average_over_uploaded_csv() {
    let ds = sales_dataset();
    let query = ChartQuery {
        dataset_id: ds.id,
        y_axis: "sales".to_string(),
        aggregation: "avg".to_string(),
        ..ChartQuery::default()
    };
    let out = run_query(&ds, &query);
    assert_eq!(out.len(), 1);
    match &out[0]["sales"] {
        Value::Float(v) => assert!((v - 35.0 / 3.0).abs() < 1e-9),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn dataset_survives_persistence_round_trip() {
    let ds = sales_dataset();
    let blob = ds.encode_rows().unwrap();
    let restored = Dataset {
        id: ds.id,
        name: ds.name.clone(),
        columns: ds.columns.clone(),
        rows: Dataset::decode_rows(&blob).unwrap(),
    };
    assert_eq!(restored.rows, ds.rows);

    // Queries over the restored dataset behave identically.
    let query = ChartQuery {
        dataset_id: ds.id,
        y_axis: "sales".to_string(),
        aggregation: "max".to_string(),
        group_by: vec!["region".to_string()],
        ..ChartQuery::default()
    };
    assert_eq!(run_query(&restored, &query), run_query(&ds, &query));
}

#[test]
fn xlsx_fixture_ingestion() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/simple.xlsx");
    let bytes = std::fs::read(path).unwrap();
    let table = parse(&bytes, FileKind::Xlsx).unwrap();

    // Missing B1 header cell is synthesized by position.
    assert_eq!(table.columns, vec!["name", "Column2", "score"]);
    // The fully blank third sheet row is skipped.
    assert_eq!(table.rows.len(), 2);

    assert_eq!(table.rows[0]["name"], Value::Text("alice".into()));
    assert_eq!(table.rows[0]["Column2"], Value::Integer(1));
    assert_eq!(table.rows[0]["score"], Value::Float(9.5));

    assert_eq!(table.rows[1]["name"], Value::Text("bob".into()));
    // Boolean cells round-trip through text and come back as Text.
    assert_eq!(table.rows[1]["Column2"], Value::Text("true".into()));
    // A whole number loses its trailing .0 and infers as Integer.
    assert_eq!(table.rows[1]["score"], Value::Integer(7));
}

#[test]
fn xlsx_dataset_queries() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/simple.xlsx");
    let bytes = std::fs::read(path).unwrap();
    let ds = Dataset::from_table(2, "scores", parse(&bytes, FileKind::Xlsx).unwrap());

    let query = ChartQuery {
        dataset_id: ds.id,
        y_axis: "score".to_string(),
        aggregation: "sum".to_string(),
        ..ChartQuery::default()
    };
    let out = run_query(&ds, &query);
    assert_eq!(out[0]["score"], Value::Float(16.5));
}

#[test]
fn upload_naming_flow() {
    assert_eq!(dataset_name_from_file("Q1 Sales.csv"), "Q1 Sales");
    let existing = ["Q1 Sales"];
    let name = unique_dataset_name("Q1 Sales", |n| existing.contains(&n));
    assert_eq!(name, "Q1 Sales (1)");
}

#[test]
fn ingestion_failures() {
    assert!(matches!(
        parse(b"", FileKind::Csv),
        Err(EngineError::EmptyInput)
    ));
    assert!(matches!(
        parse(b"junk bytes", FileKind::Xlsx),
        Err(EngineError::Format { .. })
    ));
    assert!(matches!(
        FileKind::from_file_name("data.parquet"),
        Err(EngineError::UnsupportedFormat(_))
    ));
}
