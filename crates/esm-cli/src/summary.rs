use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use esm_cli::{RunOutcome, RunResult};
use esm_model::{Issue, Severity};

pub fn print_summary(result: &RunResult) {
    println!("Source: {}", result.source_id);
    println!("Input: {}", result.input.display());
    if !result.written.is_empty() {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.report_path {
        println!("Validation report: {}", path.display());
    }
    println!(
        "Records: {} read, {} rejected, {} with imputed fields",
        result.record_count,
        result.normalization.rejected,
        result.normalization.imputed_records
    );

    if result.outcome == RunOutcome::RecordsRejected {
        print_record_errors(result);
        println!("Outcome: {}", outcome_label(result.outcome));
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for count in result.table_counts() {
        table.add_row(vec![Cell::new(count.table), Cell::new(count.rows)]);
    }
    println!("{table}");

    print_imputation_table(result);

    let divergent: usize = result.divergent.values().sum();
    if divergent > 0 {
        println!("Records with attributes differing from their dimension row: {divergent}");
    }

    if let Some(report) = &result.report {
        print_issue_table(&report.issues);
        println!(
            "Validation: {} errors, {} warnings",
            report.error_count(),
            report.warning_count()
        );
    }
    println!("Outcome: {}", outcome_label(result.outcome));
}

fn outcome_label(outcome: RunOutcome) -> String {
    let label = outcome.label();
    if outcome.is_failure() {
        format!("{label} (no tables written)")
    } else {
        label.to_string()
    }
}

fn print_record_errors(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Record ID"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in &result.record_errors {
        table.add_row(vec![
            Cell::new(error.position),
            dim_cell(error.record_id),
            Cell::new(&error.kind).fg(Color::Red),
        ]);
    }
    println!();
    println!("Rejected records:");
    println!("{table}");
}

fn print_imputation_table(result: &RunResult) {
    let imputations = &result.normalization.imputations;
    if imputations.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Imputed")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, count) in imputations {
        table.add_row(vec![Cell::new(column), count_cell(*count, Color::Yellow)]);
    }
    println!();
    println!("Imputations:");
    println!("{table}");
}

fn print_issue_table(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_key(|issue| severity_rank(issue.severity()));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Table"),
        header_cell("Record ID"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Center);
    for issue in ordered {
        let record = match issue.record_id() {
            Some(id) => dim_cell(id),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            severity_cell(issue.severity()),
            Cell::new(issue.code()),
            Cell::new(issue.table()),
            record,
            Cell::new(issue),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
    };
    Cell::new(severity.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
