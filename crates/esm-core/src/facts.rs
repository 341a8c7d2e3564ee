//! Fact assembly: foreign-key resolution and derived measures.

use esm_model::{
    CustomerRow, DateRow, DimensionEntity, FactKind, LookupIndex, LookupIndices, NormalizedRecord,
    PerformanceFact, ProductRow, ResolutionGap, SalesFact, StoreRow, SurrogateKey,
};

/// Fact rows built from one run's records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactAssembly {
    pub sales: Vec<SalesFact>,
    pub performance: Vec<PerformanceFact>,
    /// Records excluded from a fact table because a lookup failed.
    pub gaps: Vec<ResolutionGap>,
}

/// Derived sales measures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesMeasures {
    pub cost_of_goods: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

/// Cost of goods, profit and margin for one record.
///
/// Cost of goods is the record's unit cost times units sold. The margin is 0
/// when revenue is 0 or so small the ratio overflows.
pub fn derive_sales_measures(record: &NormalizedRecord) -> SalesMeasures {
    let units = record.measures.units_sold as f64;
    let revenue = record.measures.revenue;
    let cost_of_goods = record.product.cost * units;
    let profit = revenue - cost_of_goods;
    let margin = profit / revenue;
    let profit_margin = if revenue == 0.0 || !margin.is_finite() {
        0.0
    } else {
        margin
    };
    SalesMeasures {
        cost_of_goods,
        profit,
        profit_margin,
    }
}

/// Resolves the foreign keys of one record, collecting gaps for misses.
struct Resolver<'a> {
    lookups: &'a LookupIndices,
    record: &'a NormalizedRecord,
    fact: FactKind,
    gaps: Vec<ResolutionGap>,
}

impl<'a> Resolver<'a> {
    fn new(lookups: &'a LookupIndices, record: &'a NormalizedRecord, fact: FactKind) -> Self {
        Self {
            lookups,
            record,
            fact,
            gaps: Vec::new(),
        }
    }

    fn resolve<D: DimensionEntity>(
        &mut self,
        index: &LookupIndex<D::NaturalKey>,
    ) -> Option<SurrogateKey> {
        let natural_key = D::natural_key_of(self.record);
        let key = index.get(&natural_key);
        if key.is_none() {
            self.gaps.push(ResolutionGap {
                fact: self.fact,
                dimension: D::KIND,
                record_id: self.record.id,
                position: self.record.position,
                natural_key: natural_key.to_string(),
            });
        }
        key
    }

    fn date(&mut self) -> Option<SurrogateKey> {
        let lookups = self.lookups;
        self.resolve::<DateRow>(&lookups.date)
    }

    fn product(&mut self) -> Option<SurrogateKey> {
        let lookups = self.lookups;
        self.resolve::<ProductRow>(&lookups.product)
    }

    fn customer(&mut self) -> Option<SurrogateKey> {
        let lookups = self.lookups;
        self.resolve::<CustomerRow>(&lookups.customer)
    }

    fn store(&mut self) -> Option<SurrogateKey> {
        let lookups = self.lookups;
        self.resolve::<StoreRow>(&lookups.store)
    }
}

fn sales_fact(
    record: &NormalizedRecord,
    lookups: &LookupIndices,
    next_key: SurrogateKey,
) -> Result<SalesFact, Vec<ResolutionGap>> {
    let mut resolver = Resolver::new(lookups, record, FactKind::Sales);
    // Resolve all four before bailing so every missing dimension is reported.
    let keys = (
        resolver.date(),
        resolver.product(),
        resolver.customer(),
        resolver.store(),
    );
    let (Some(date_key), Some(product_key), Some(customer_key), Some(store_key)) = keys else {
        return Err(resolver.gaps);
    };

    let derived = derive_sales_measures(record);
    Ok(SalesFact {
        sales_key: next_key,
        record_id: record.id,
        transaction_id: record.transaction_id.clone(),
        date_key,
        product_key,
        customer_key,
        store_key,
        units_sold: record.measures.units_sold,
        revenue: record.measures.revenue,
        discount: record.measures.discount,
        cost_of_goods: derived.cost_of_goods,
        profit: derived.profit,
        profit_margin: derived.profit_margin,
        payment_method: record.payment_method.clone(),
    })
}

fn performance_fact(
    record: &NormalizedRecord,
    lookups: &LookupIndices,
    next_key: SurrogateKey,
) -> Result<PerformanceFact, Vec<ResolutionGap>> {
    let mut resolver = Resolver::new(lookups, record, FactKind::Performance);
    let keys = (resolver.date(), resolver.product(), resolver.store());
    let (Some(date_key), Some(product_key), Some(store_key)) = keys else {
        return Err(resolver.gaps);
    };

    Ok(PerformanceFact {
        performance_key: next_key,
        record_id: record.id,
        date_key,
        product_key,
        store_key,
        satisfaction_score: record.measures.satisfaction_score,
        failure_flag: record.measures.failure_flag,
        energy_consumption: record.measures.energy_consumption,
    })
}

/// Build sales and performance facts against completed lookup indices.
///
/// Fact keys are assigned from 1 in record order, counting only rows that
/// were created. A record whose lookups fail produces no row in that fact
/// table and one gap per missing dimension.
pub fn assemble_facts(records: &[NormalizedRecord], lookups: &LookupIndices) -> FactAssembly {
    let mut assembly = FactAssembly {
        sales: Vec::with_capacity(records.len()),
        performance: Vec::with_capacity(records.len()),
        gaps: Vec::new(),
    };

    for record in records {
        match sales_fact(record, lookups, SurrogateKey::for_index(assembly.sales.len())) {
            Ok(fact) => assembly.sales.push(fact),
            Err(gaps) => assembly.gaps.extend(gaps),
        }
        match performance_fact(
            record,
            lookups,
            SurrogateKey::for_index(assembly.performance.len()),
        ) {
            Ok(fact) => assembly.performance.push(fact),
            Err(gaps) => assembly.gaps.extend(gaps),
        }
    }

    for gap in &assembly.gaps {
        tracing::warn!(
            fact = %gap.fact,
            dimension = %gap.dimension,
            position = gap.position,
            record_id = %gap.record_id,
            "dimension lookup failed; record excluded from fact table"
        );
    }
    tracing::debug!(
        sales = assembly.sales.len(),
        performance = assembly.performance.len(),
        gaps = assembly.gaps.len(),
        "assembled facts"
    );

    assembly
}
