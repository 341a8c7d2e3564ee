//! Tests for esm-model types.

use esm_model::{
    DimensionKind, FactKind, Issue, RecordId, ResolutionGap, Severity, StarSchema, SurrogateKey,
    ValidationReport,
};

fn gap() -> ResolutionGap {
    ResolutionGap {
        fact: FactKind::Sales,
        dimension: DimensionKind::Store,
        record_id: RecordId::derive("sales.csv", 7),
        position: 7,
        natural_key: "(S001, Mall, Germany)".to_string(),
    }
}

#[test]
fn report_counts_errors_and_warnings() {
    let mut report = ValidationReport::new();
    report.add(Issue::ResolutionGap(gap()));
    assert!(report.passed());
    assert_eq!(report.warning_count(), 1);

    report.add(Issue::OrphanForeignKey {
        fact: FactKind::Sales,
        fact_key: SurrogateKey::new(3),
        record_id: RecordId::derive("sales.csv", 3),
        dimension: DimensionKind::Product,
        key: SurrogateKey::new(99),
    });
    assert!(!report.passed());
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors().count(), 1);
    assert_eq!(report.warnings().count(), 1);
}

#[test]
fn issue_messages_identify_rows() {
    let orphan = Issue::OrphanForeignKey {
        fact: FactKind::Performance,
        fact_key: SurrogateKey::new(4),
        record_id: RecordId::derive("sales.csv", 4),
        dimension: DimensionKind::Date,
        key: SurrogateKey::new(12),
    };
    assert_eq!(orphan.severity(), Severity::Error);
    assert_eq!(orphan.table(), "fact_performance");
    assert_eq!(
        orphan.to_string(),
        "fact_performance row 4: date_key 12 not found in dim_date"
    );

    let gap = Issue::ResolutionGap(gap());
    assert_eq!(gap.code(), "RG001");
    assert!(gap.to_string().starts_with("record 7 ("));
    assert!(gap.to_string().ends_with("no Store key for (S001, Mall, Germany) in fact_sales"));
}

#[test]
fn report_serializes_with_hex_record_ids() {
    let mut report = ValidationReport::new();
    report.add(Issue::ResolutionGap(gap()));
    let json = serde_json::to_value(&report).expect("serialize report");

    let issue = &json["issues"][0];
    assert_eq!(issue["kind"], "resolution_gap");
    assert_eq!(issue["dimension"], "store");
    assert_eq!(
        issue["record_id"],
        RecordId::derive("sales.csv", 7).to_hex().as_str()
    );

    let round: ValidationReport = serde_json::from_value(json).expect("deserialize report");
    assert_eq!(round, report);
}

#[test]
fn empty_schema_counts_every_table() {
    let schema = StarSchema::default();
    let counts = schema.table_counts();
    let names: Vec<&str> = counts.iter().map(|count| count.table).collect();
    assert_eq!(
        names,
        vec![
            "dim_date",
            "dim_product",
            "dim_customer",
            "dim_store",
            "fact_sales",
            "fact_performance"
        ]
    );
    assert!(schema.is_empty());
}
