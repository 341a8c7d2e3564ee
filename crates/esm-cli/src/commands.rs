use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use esm_cli::{RunResult, run};
use esm_model::Column;

use crate::cli::{CheckArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_columns() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Required"]);
    apply_table_style(&mut table);
    for column in Column::ALL {
        let required = if column.is_required() { "yes" } else { "no" };
        table.add_row(vec![column.name(), column.value_type(), required]);
    }
    println!("{table}");
    println!("customer_country and store_country may both be headed plain 'country', in that order.");
    Ok(())
}

pub fn run_model(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("command", name = "run");
    let _guard = span.enter();
    run(&args.input, &args.options())
}

pub fn run_check(args: &CheckArgs) -> Result<RunResult> {
    let span = info_span!("command", name = "check");
    let _guard = span.enter();
    run(&args.input, &args.options())
}
