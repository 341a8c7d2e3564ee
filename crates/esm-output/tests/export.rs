//! Export tests against a temporary output directory.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use esm_model::{
    DateRow, DimensionTable, RecordError, RecordErrorKind, RecordId, StarSchema, StoreRow,
    SurrogateKey, ValidationReport,
};
use esm_output::{REPORT_FILE, ReportDocument, export_schema, write_report_json};
use tempfile::TempDir;

fn schema() -> StarSchema {
    StarSchema {
        dates: DimensionTable::from_rows(vec![DateRow::new(
            SurrogateKey::FIRST,
            NaiveDate::from_ymd_opt(2023, 7, 15).unwrap(),
        )]),
        stores: DimensionTable::from_rows(vec![StoreRow {
            store_key: SurrogateKey::FIRST,
            store_id: "S-1".to_string(),
            store_type: "Big Box".to_string(),
            country: "United Kingdom".to_string(),
        }]),
        ..StarSchema::default()
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn writes_all_tables_with_headers() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("star_schema");
    let written = export_schema(&out, &schema()).unwrap();

    assert_eq!(written.len(), 6);
    assert_eq!(
        file_names(&out),
        vec![
            "dim_customer.csv",
            "dim_date.csv",
            "dim_product.csv",
            "dim_store.csv",
            "fact_performance.csv",
            "fact_sales.csv",
        ]
    );

    let stores = fs::read_to_string(out.join("dim_store.csv")).unwrap();
    assert_eq!(
        stores,
        "store_key,store_id,store_type,country\n1,S-1,Big Box,United Kingdom\n"
    );

    let dates = fs::read_to_string(out.join("dim_date.csv")).unwrap();
    assert!(dates.starts_with("date_key,date,date_code,day,month,quarter,year,"));
    assert!(dates.contains("1,2023-07-15,20230715,15,7,3,2023,5,Saturday,July,true"));

    let sales = fs::read_to_string(out.join("fact_sales.csv")).unwrap();
    assert_eq!(sales.lines().count(), 1);
}

#[test]
fn export_overwrites_previous_files() {
    let dir = TempDir::new().unwrap();
    export_schema(dir.path(), &schema()).unwrap();
    let first = fs::read(dir.path().join("dim_date.csv")).unwrap();

    export_schema(dir.path(), &StarSchema::default()).unwrap();
    let second = fs::read_to_string(dir.path().join("dim_date.csv")).unwrap();

    assert_ne!(first, second.as_bytes());
    assert_eq!(second.lines().count(), 1);
    assert!(file_names(dir.path()).iter().all(|name| !name.ends_with(".tmp")));
}

fn previous_files(dir: &Path, names: &[&str]) -> Vec<Vec<u8>> {
    names.iter().map(|name| fs::read(dir.join(name)).unwrap()).collect()
}

const KEPT: [&str; 5] = [
    "dim_date.csv",
    "dim_product.csv",
    "dim_customer.csv",
    "dim_store.csv",
    "fact_performance.csv",
];

#[test]
fn blocked_target_keeps_previous_set() {
    let dir = TempDir::new().unwrap();
    export_schema(dir.path(), &schema()).unwrap();
    let before = previous_files(dir.path(), &KEPT);

    let sales = dir.path().join("fact_sales.csv");
    fs::remove_file(&sales).unwrap();
    fs::create_dir(&sales).unwrap();
    fs::write(sales.join("keep.txt"), "occupied").unwrap();

    let error = export_schema(dir.path(), &StarSchema::default()).unwrap_err();
    assert!(format!("{error:#}").contains("not a file"), "{error:#}");

    assert_eq!(previous_files(dir.path(), &KEPT), before);
    assert!(sales.join("keep.txt").is_file());
    assert!(
        file_names(dir.path())
            .iter()
            .all(|name| !name.ends_with(".tmp") && !name.ends_with(".bak"))
    );
}

#[test]
fn staging_failure_keeps_previous_set() {
    let dir = TempDir::new().unwrap();
    export_schema(dir.path(), &schema()).unwrap();
    let mut all = KEPT.to_vec();
    all.push("fact_sales.csv");
    let before = previous_files(dir.path(), &all);

    // The sales table is staged fifth; its staging path cannot be created.
    fs::create_dir(dir.path().join(".fact_sales.csv.tmp")).unwrap();

    export_schema(dir.path(), &StarSchema::default()).unwrap_err();

    assert_eq!(previous_files(dir.path(), &all), before);
    let leftovers: Vec<String> = file_names(dir.path())
        .into_iter()
        .filter(|name| name.starts_with('.') && name != ".fact_sales.csv.tmp")
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn rejected_report_lists_record_errors() {
    let dir = TempDir::new().unwrap();
    let errors = vec![RecordError::new(
        3,
        RecordId::derive("sales.csv", 3),
        RecordErrorKind::MissingRequired {
            column: esm_model::Column::ProductId,
        },
    )];
    let document = ReportDocument::rejected("sales.csv", Path::new("in/sales.csv"), 5, &errors);
    let path = write_report_json(dir.path(), &document).unwrap();

    assert_eq!(path.file_name().unwrap(), REPORT_FILE);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["record_errors"][0]["position"], 3);
    assert_eq!(json["record_errors"][0]["kind"]["kind"], "missing_required");
    assert_eq!(json["record_errors"][0]["kind"]["column"], "product_id");
    assert_eq!(file_names(dir.path()), vec![REPORT_FILE.to_string()]);
}

#[test]
fn validated_report_counts_tables() {
    let dir = TempDir::new().unwrap();
    let report = ValidationReport::new();
    let schema = schema();
    let document =
        ReportDocument::validated("sales.csv", Path::new("sales.csv"), 1, &schema, &report);
    let path = write_report_json(dir.path(), &document).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["passed"], true);
    assert_eq!(json["tables"][0]["table"], "dim_date");
    assert_eq!(json["tables"][3]["rows"], 1);
}
