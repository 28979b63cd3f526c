//! Decoders for structured (layer x row x column) head and budget files.

use log::{info, warn};

use crate::modflow::iter::{BudgetTerms, HeadSteps};
use crate::modflow::types::error::Result;
use crate::modflow::types::models::{BudgetSeries, GridShape, HeadSeries, OrderedMap, TermFilter};

/// Decode a structured head file held in memory.
///
/// Returns one `(nlay, nrow, ncol)` array per time step plus the cumulative
/// time of each step in file order. A shape with a zero dimension returns an
/// empty series without looking at `data`.
pub fn heads(data: &[u8], shape: GridShape) -> Result<HeadSeries> {
    let mut series = HeadSeries::default();
    if shape.is_empty() {
        return Ok(series);
    }

    let mut steps = HeadSteps::new(data, shape);
    for step in steps.by_ref() {
        let step = step?;
        series.totim.push(step.totim);
        if series.heads.insert(step.key, step.data).is_some() {
            warn!("Time step {} appears more than once in head file; keeping the later one", step.key);
        }
    }
    series.stats = steps.stats();
    debug_assert_eq!(series.stats.bytes_consumed, data.len() as u64);

    info!(
        "Decoded {} head time steps from {} records ({} bytes)",
        series.heads.len(), series.stats.records, series.stats.bytes_consumed
    );
    Ok(series)
}

/// Decode a structured budget file held in memory.
///
/// Returns term label -> time step -> `(nlay, nrow, ncol)` array, keeping only
/// the labels `filter` retains.
pub fn budget(data: &[u8], shape: GridShape, filter: &TermFilter) -> Result<BudgetSeries> {
    let mut series = BudgetSeries::default();
    if shape.is_empty() {
        return Ok(series);
    }

    let mut terms = BudgetTerms::new(data, shape, filter);
    for term in terms.by_ref() {
        let term = term?;
        let by_step = series.terms.get_or_insert_with(term.text.clone(), OrderedMap::new);
        if by_step.insert(term.key, term.data).is_some() {
            warn!(
                "Budget term '{}' appears more than once for time step {}; keeping the later one",
                term.text, term.key
            );
        }
    }
    series.stats = terms.stats();
    debug_assert_eq!(series.stats.bytes_consumed, data.len() as u64);

    info!(
        "Decoded {} budget terms from {} records ({} bytes)",
        series.terms.len(), series.stats.records, series.stats.bytes_consumed
    );
    Ok(series)
}
