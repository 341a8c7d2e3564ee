//! End-to-end runs against temporary input files.

use std::fs;
use std::path::{Path, PathBuf};

use esm_cli::pipeline::{ingest, model, output, validate};
use esm_cli::{RunOutcome, default_output_dir, run};
use esm_model::{Column, PipelineOptions, SurrogateKey, TieBreakPolicy};
use tempfile::TempDir;

const TABLES: [&str; 6] = [
    "dim_date.csv",
    "dim_product.csv",
    "dim_customer.csv",
    "dim_store.csv",
    "fact_sales.csv",
    "fact_performance.csv",
];

fn base_value(column: Column) -> &'static str {
    match column {
        Column::ProductId => "HeatPump-X",
        Column::Category => "hvac",
        Column::Subcategory => "heat pump",
        Column::Price => "500",
        Column::Cost => "300",
        Column::CustomerId => "C-1",
        Column::Segment => "home",
        Column::CustomerCountry => "USA",
        Column::StoreId => "S-1",
        Column::StoreType => "big box",
        Column::StoreCountry => "us",
        Column::TransactionDate => "2023-05-01",
        Column::UnitsSold => "2",
        Column::Revenue => "1000",
        Column::SatisfactionScore => "85",
        Column::FailureFlag => "0",
        Column::EnergyConsumption => "3.2",
        Column::TransactionId => "T-100",
        Column::ProductName => "aero pump",
        Column::Discount => "0.1",
        Column::PaymentMethod => "card",
    }
}

fn header() -> String {
    Column::ALL.map(Column::name).join(",")
}

fn row(overrides: &[(Column, &str)]) -> String {
    Column::ALL
        .map(|column| {
            overrides
                .iter()
                .find(|(c, _)| *c == column)
                .map_or(base_value(column), |(_, value)| *value)
        })
        .join(",")
}

fn write_input(dir: &Path, rows: &[String]) -> PathBuf {
    let path = dir.join("sales.csv");
    let mut content = header();
    content.push('\n');
    for line in rows {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

fn three_rows() -> Vec<String> {
    vec![
        row(&[]),
        row(&[
            (Column::Price, "550"),
            (Column::CustomerId, "C-2"),
            (Column::TransactionDate, "2023-05-02"),
            (Column::TransactionId, "T-101"),
        ]),
        row(&[
            (Column::ProductId, "Solar-Panel-200"),
            (Column::Category, "solar"),
            (Column::Subcategory, "panel"),
            (Column::StoreId, "S-2"),
            (Column::StoreCountry, "UK"),
            (Column::TransactionId, "T-102"),
        ]),
    ]
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn exports_star_schema_and_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let result = run(&input, &PipelineOptions::default()).unwrap();

    assert_eq!(result.outcome, RunOutcome::Exported);
    assert!(!result.has_errors());
    assert_eq!(result.output_dir, default_output_dir(&input));
    assert_eq!(result.record_count, 3);
    assert_eq!(result.written.len(), 6);

    let schema = &result.schema;
    assert_eq!(schema.dates.len(), 2);
    assert_eq!(schema.products.len(), 2);
    assert_eq!(schema.customers.len(), 2);
    assert_eq!(schema.stores.len(), 2);
    assert_eq!(schema.sales.len(), 3);
    assert_eq!(schema.performance.len(), 3);

    // HeatPump-X keeps the attributes of the record that introduced it.
    let heat_pump = &schema.products.rows()[0];
    assert_eq!(heat_pump.product_id, "HeatPump-X");
    assert_eq!(heat_pump.category, "HVAC");
    assert_eq!(heat_pump.subcategory, "Heat Pump");
    assert_eq!(heat_pump.price, 500.0);
    assert_eq!(schema.sales[1].product_key, heat_pump.product_key);
    assert_eq!(result.divergent.values().sum::<usize>(), 1);

    let out = &result.output_dir;
    for table in TABLES {
        assert!(out.join(table).is_file(), "{table} missing");
    }
    let customers = fs::read_to_string(out.join("dim_customer.csv")).unwrap();
    insta::assert_snapshot!(customers, @r"
    customer_key,customer_id,segment,country
    1,C-1,Residential,United States
    2,C-2,Residential,United States
    ");
    let stores = fs::read_to_string(out.join("dim_store.csv")).unwrap();
    insta::assert_snapshot!(stores, @r"
    store_key,store_id,store_type,country
    1,S-1,Big Box,United States
    2,S-2,Big Box,United Kingdom
    ");

    let report = read_json(result.report_path.as_ref().unwrap());
    assert_eq!(report["source_id"], "sales.csv");
    assert_eq!(report["passed"], true);
    assert_eq!(report["exported"], true);
    assert_eq!(report["record_count"], 3);
    assert_eq!(report["tables"][4]["table"], "fact_sales");
    assert_eq!(report["tables"][4]["rows"], 3);
}

#[test]
fn rerun_produces_identical_files() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let first = run(&input, &PipelineOptions::default()).unwrap();
    let snapshot: Vec<Vec<u8>> = first
        .written
        .iter()
        .chain(first.report_path.iter())
        .map(|path| fs::read(path).unwrap())
        .collect();

    let second = run(&input, &PipelineOptions::default()).unwrap();
    let again: Vec<Vec<u8>> = second
        .written
        .iter()
        .chain(second.report_path.iter())
        .map(|path| fs::read(path).unwrap())
        .collect();

    assert_eq!(snapshot.len(), 7);
    assert_eq!(snapshot, again);
    assert_eq!(first.schema, second.schema);
}

#[test]
fn header_only_input_exports_empty_tables() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[]);
    let result = run(&input, &PipelineOptions::default()).unwrap();

    assert_eq!(result.outcome, RunOutcome::Exported);
    assert!(result.schema.is_empty());
    for table in TABLES {
        let content = fs::read_to_string(result.output_dir.join(table)).unwrap();
        assert_eq!(content.lines().count(), 1, "{table} should hold only a header");
    }
}

#[test]
fn empty_product_id_rejects_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        &[row(&[]), row(&[(Column::ProductId, "")]), row(&[])],
    );
    let out = default_output_dir(&input);
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("dim_product.csv"), "previous run\n").unwrap();

    let result = run(&input, &PipelineOptions::default()).unwrap();

    assert_eq!(result.outcome, RunOutcome::RecordsRejected);
    assert!(result.has_errors());
    assert!(result.written.is_empty());
    assert!(result.report.is_none());
    assert_eq!(result.record_errors.len(), 1);
    assert_eq!(result.record_errors[0].position, 2);

    assert_eq!(
        fs::read_to_string(out.join("dim_product.csv")).unwrap(),
        "previous run\n"
    );
    assert!(!out.join("fact_sales.csv").exists());

    let report = read_json(&out.join("validation_report.json"));
    assert_eq!(report["passed"], false);
    assert_eq!(report["exported"], false);
    assert_eq!(report["record_count"], 3);
    assert_eq!(report["record_errors"][0]["position"], 2);
    assert_eq!(report["record_errors"][0]["kind"]["column"], "product_id");
}

#[test]
fn out_of_range_satisfaction_is_clamped() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[row(&[(Column::SatisfactionScore, "150")])]);
    let result = run(&input, &PipelineOptions::default().with_dry_run(true)).unwrap();

    assert_eq!(result.outcome, RunOutcome::DryRun);
    assert_eq!(result.schema.performance[0].satisfaction_score, 100.0);
    assert_eq!(
        result.normalization.imputations.get(&Column::SatisfactionScore),
        Some(&1)
    );
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let result = run(&input, &PipelineOptions::default().with_dry_run(true)).unwrap();

    assert_eq!(result.outcome, RunOutcome::DryRun);
    assert!(result.report.as_ref().unwrap().passed());
    assert!(result.written.is_empty());
    assert!(result.report_path.is_none());
    assert!(!result.output_dir.exists());
}

#[test]
fn no_report_skips_report_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let out = dir.path().join("custom");
    let options = PipelineOptions::default()
        .with_output_dir(&out)
        .with_report(false);
    let result = run(&input, &options).unwrap();

    assert_eq!(result.output_dir, out);
    assert_eq!(result.written.len(), 6);
    assert!(result.report_path.is_none());
    assert!(!out.join("validation_report.json").exists());
}

#[test]
fn last_seen_keeps_latest_attributes() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let options = PipelineOptions::default()
        .with_dry_run(true)
        .with_tie_break(TieBreakPolicy::LastSeen);
    let result = run(&input, &options).unwrap();

    let heat_pump = &result.schema.products.rows()[0];
    assert_eq!(heat_pump.product_key.get(), 1);
    assert_eq!(heat_pump.price, 550.0);
}

#[test]
fn source_id_changes_record_ids() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let default = run(&input, &PipelineOptions::default().with_dry_run(true)).unwrap();
    let named = run(
        &input,
        &PipelineOptions::default()
            .with_dry_run(true)
            .with_source_id("batch-7"),
    )
    .unwrap();

    assert_eq!(named.source_id, "batch-7");
    assert_ne!(
        default.schema.sales[0].record_id,
        named.schema.sales[0].record_id
    );
    assert_eq!(
        default.schema.sales[0].sales_key,
        named.schema.sales[0].sales_key
    );
}

#[test]
fn positional_country_columns_export() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(
        &input,
        "product_id,category,subcategory,price,cost,customer_id,segment,country,\
         store_id,store_type,country,transaction_date,units_sold,revenue,\
         satisfaction_score,failure_flag,energy_consumption\n\
         HeatPump-X,hvac,heat pump,500,300,C-1,home,USA,S-1,outlet,DE,2023-05-01,\
         2,1000,85,0,3.2\n",
    )
    .unwrap();

    let result = run(&input, &PipelineOptions::default()).unwrap();

    assert_eq!(result.outcome, RunOutcome::Exported);
    assert_eq!(result.schema.customers.rows()[0].country, "United States");
    assert_eq!(result.schema.stores.rows()[0].country, "Germany");
    let stores = fs::read_to_string(result.output_dir.join("dim_store.csv")).unwrap();
    assert!(stores.contains("S-1,Outlet,Germany"), "{stores}");
}

#[test]
fn integrity_violation_blocks_export() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &three_rows());
    let options = PipelineOptions::default();
    let out = dir.path().join("out");

    let ingested = ingest(&input, "sales.csv").unwrap();
    let mut modeled = model(&ingested.records, &options);
    modeled.schema.sales[0].product_key = SurrogateKey::new(99);
    let report = validate(&modeled);
    assert!(!report.passed());

    let written = output(
        &out,
        "sales.csv",
        &input,
        &ingested,
        &modeled,
        &report,
        &options,
    )
    .unwrap();

    assert!(written.tables.is_empty());
    for table in TABLES {
        assert!(!out.join(table).exists(), "{table} written");
    }
    let report = read_json(written.report.as_ref().unwrap());
    assert_eq!(report["passed"], false);
    assert_eq!(report["exported"], false);
    assert!(report["error_count"].as_u64().unwrap() >= 1);
}

#[test]
fn huge_cost_stays_finite() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        &[row(&[(Column::Cost, "1e308"), (Column::UnitsSold, "10")])],
    );
    let result = run(&input, &PipelineOptions::default().with_dry_run(true)).unwrap();

    assert_eq!(result.outcome, RunOutcome::DryRun);
    assert!(result.report.as_ref().unwrap().passed());
    let sale = &result.schema.sales[0];
    assert!(sale.cost_of_goods.is_finite());
    assert!(sale.profit.is_finite());
    assert!(sale.profit_margin.is_finite());
    assert_eq!(result.normalization.imputations.get(&Column::Cost), Some(&1));
}

#[test]
fn na_product_id_is_kept() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[row(&[(Column::ProductId, "NA")])]);
    let result = run(&input, &PipelineOptions::default().with_dry_run(true)).unwrap();

    assert_eq!(result.outcome, RunOutcome::DryRun);
    assert_eq!(result.schema.products.rows()[0].product_id, "NA");
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(&input, "product_id,category\nHeatPump-X,hvac\n").unwrap();

    let error = run(&input, &PipelineOptions::default()).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("required columns missing"), "{message}");
    assert!(message.contains("revenue"), "{message}");
    assert!(!default_output_dir(&input).exists());
}

#[test]
fn missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let error = run(&dir.path().join("absent.csv"), &PipelineOptions::default()).unwrap_err();
    assert!(format!("{error:#}").contains("not found"));
}
