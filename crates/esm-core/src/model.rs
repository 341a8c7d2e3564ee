//! Dimension building followed by fact assembly.

use std::collections::BTreeMap;
use std::time::Instant;

use esm_model::{
    DimensionKind, LookupIndices, NormalizedRecord, ResolutionGap, StarSchema, TieBreakPolicy,
};
use tracing::info_span;

use crate::dimensions::build_dimensions;
use crate::facts::assemble_facts;

/// The modeled star schema plus the by-products needed downstream.
#[derive(Debug, Clone, Default)]
pub struct StarModel {
    pub schema: StarSchema,
    pub lookups: LookupIndices,
    pub gaps: Vec<ResolutionGap>,
    /// Divergent records per dimension (see [`crate::BuiltDimension`]).
    pub divergent: BTreeMap<DimensionKind, usize>,
}

/// Build all dimensions, then assemble facts against their lookups.
pub fn model_star_schema(records: &[NormalizedRecord], policy: TieBreakPolicy) -> StarModel {
    let dimension_span = info_span!("build_dimensions", records = records.len());
    let dimension_guard = dimension_span.enter();
    let start = Instant::now();
    let dimensions = build_dimensions(records, policy);
    tracing::info!(
        dates = dimensions.dates.len(),
        products = dimensions.products.len(),
        customers = dimensions.customers.len(),
        stores = dimensions.stores.len(),
        divergent = dimensions.divergent_total(),
        duration_ms = start.elapsed().as_millis(),
        "dimensions built"
    );
    drop(dimension_guard);

    let fact_span = info_span!("assemble_facts", records = records.len());
    let _fact_guard = fact_span.enter();
    let start = Instant::now();
    let facts = assemble_facts(records, &dimensions.lookups);
    tracing::info!(
        sales = facts.sales.len(),
        performance = facts.performance.len(),
        gaps = facts.gaps.len(),
        duration_ms = start.elapsed().as_millis(),
        "facts assembled"
    );

    StarModel {
        schema: StarSchema {
            dates: dimensions.dates,
            products: dimensions.products,
            customers: dimensions.customers,
            stores: dimensions.stores,
            sales: facts.sales,
            performance: facts.performance,
        },
        lookups: dimensions.lookups,
        gaps: facts.gaps,
        divergent: dimensions.divergent,
    }
}
