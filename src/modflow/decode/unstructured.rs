//! Decoders for unstructured (node-based) head and budget files.

use log::{info, warn};

use crate::modflow::iter::{UnstructuredBudgetTerms, UnstructuredHeadLayers};
use crate::modflow::types::error::Result;
use crate::modflow::types::models::{
    RecordHeader, TermFilter, UnstructuredBudgetSeries, UnstructuredHeadSeries,
};

/// Decode an unstructured head file held in memory.
///
/// The stored array of a time step is rewritten after every layer record
/// with the running concatenation, so once the step's last layer has been
/// read it holds all layers in increasing layer order.
pub fn heads(data: &[u8]) -> Result<UnstructuredHeadSeries> {
    let mut series = UnstructuredHeadSeries::default();

    let mut layers = UnstructuredHeadLayers::new(data);
    for layer in layers.by_ref() {
        let layer = layer?;
        series.heads.insert(layer.header.key(), layer.accumulated);
    }
    series.stats = layers.stats();
    debug_assert_eq!(series.stats.bytes_consumed, data.len() as u64);

    info!(
        "Decoded {} unstructured head time steps from {} records ({} bytes)",
        series.heads.len(), series.stats.records, series.stats.bytes_consumed
    );
    Ok(series)
}

/// Decode an unstructured budget file held in memory.
///
/// Arrays are keyed by `(term, node count, time step)`.
pub fn budget(data: &[u8], filter: &TermFilter) -> Result<UnstructuredBudgetSeries> {
    let mut series = UnstructuredBudgetSeries::default();

    let mut terms = UnstructuredBudgetTerms::new(data, filter);
    for term in terms.by_ref() {
        let term = term?;
        if let Some(_previous) = series.terms.insert(term.key.clone(), term.data) {
            warn!(
                "Budget term '{}' ({} nodes) appears more than once for time step {}; keeping the later one",
                term.key.term, term.key.nval, term.key.step
            );
        }
    }
    series.stats = terms.stats();
    debug_assert_eq!(series.stats.bytes_consumed, data.len() as u64);

    info!(
        "Decoded {} unstructured budget arrays from {} records ({} bytes)",
        series.terms.len(), series.stats.records, series.stats.bytes_consumed
    );
    Ok(series)
}
