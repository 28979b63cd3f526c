//! # modflow-reader
//!
//! A reader for MODFLOW binary output files: structured and unstructured
//! head (`.hds`) and cell-by-cell budget (`.cbb`/`.cbc`) files.
//!
//! Files are memory-mapped and scanned record by record, so inputs larger
//! than RAM can be read. Decoded arrays are owned copies; use a
//! [`TermFilter`] or the `iter_*` methods of [`OutputFile`] to bound memory.
//!
//! ```no_run
//! use modflow_reader::{read_budget, read_heads, GridShape, TermFilter};
//!
//! let shape = GridShape::new(7, 368, 410);
//! let hds = read_heads("data/abr.hds", shape).unwrap();
//! println!("{} time steps, last totim {:?}", hds.heads.len(), hds.totim.last());
//!
//! let filter = TermFilter::from_items(["ET", "WELLS", "RIVER LEAKAGE"]);
//! let cbb = read_budget("data/abr.cbb", shape, &filter).unwrap();
//! println!("{:?}", cbb.terms.keys().collect::<Vec<_>>());
//! ```
pub mod modflow;

// Re-export the main types for convenience
pub use modflow::{
    read_budget, read_heads, read_unstructured_budget, read_unstructured_heads,
    ModflowError, OutputFile, Result,
    iter::{BudgetTerms, HeadSteps, Record, RecordScanner, UnstructuredBudgetTerms, UnstructuredHeadLayers},
    types::kinds::{RecordKind, StructuredBudget, StructuredHead, UnstructuredBudget, UnstructuredHead},
    types::models::{
        BudgetKey, BudgetSeries, BudgetTerm, GridShape, HeadSeries, HeadStep, OrderedMap,
        RecordHeader, ScanStats, StructuredBudgetHeader, StructuredHeadHeader, TermFilter,
        TimeStepKey, UnstructuredBudgetHeader, UnstructuredBudgetTerm, UnstructuredHeadHeader,
        UnstructuredHeadLayer, UnstructuredHeadSeries, UnstructuredBudgetSeries,
    },
};
