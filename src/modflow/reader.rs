use std::path::{Path, PathBuf};

use log::info;

use super::decode::{structured, unstructured};
use super::iter::{BudgetTerms, HeadSteps, RecordScanner, UnstructuredBudgetTerms, UnstructuredHeadLayers};
use super::source::MappedFile;
use super::types::error::Result;
use super::types::kinds::RecordKind;
use super::types::models::*;

/// An opened MODFLOW binary output file.
///
/// The file is memory-mapped read-only; nothing is decoded until one of the
/// `iter_*` or decode methods is called. The same `OutputFile` can be scanned
/// any number of times, each scan starting from offset 0 with fresh state.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    source: MappedFile,
}

impl OutputFile {
    /// Open and map an output file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening MODFLOW output file: {}", path.display());
        let source = MappedFile::open(path)?;
        info!("Mapped {} bytes from {}", source.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes.
    pub fn len(&self) -> u64 {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Returns the base iterator over raw records of kind `K`.
    ///
    /// This is the lowest-level access: headers are decoded, payloads are
    /// borrowed from the mapping and left encoded.
    pub fn iter_records<K: RecordKind>(&self, ctx: K::Context) -> RecordScanner<'_, K> {
        RecordScanner::new(self.source.as_bytes(), ctx)
    }

    /// Returns an iterator over the time steps of a structured head file.
    pub fn iter_heads(&self, shape: GridShape) -> HeadSteps<'_> {
        HeadSteps::new(self.source.as_bytes(), shape)
    }

    /// Returns an iterator over the retained terms of a structured budget file.
    pub fn iter_budget<'a>(&'a self, shape: GridShape, filter: &'a TermFilter) -> BudgetTerms<'a> {
        BudgetTerms::new(self.source.as_bytes(), shape, filter)
    }

    /// Returns an iterator over the layer records of an unstructured head file.
    pub fn iter_unstructured_heads(&self) -> UnstructuredHeadLayers<'_> {
        UnstructuredHeadLayers::new(self.source.as_bytes())
    }

    /// Returns an iterator over the retained terms of an unstructured budget file.
    pub fn iter_unstructured_budget<'a>(&'a self, filter: &'a TermFilter) -> UnstructuredBudgetTerms<'a> {
        UnstructuredBudgetTerms::new(self.source.as_bytes(), filter)
    }

    /// Decode the whole file as a structured head file.
    pub fn heads(&self, shape: GridShape) -> Result<HeadSeries> {
        structured::heads(self.source.as_bytes(), shape)
    }

    /// Decode the whole file as a structured budget file.
    ///
    /// **Memory:** every retained array is held in memory at once. Use
    /// `filter` or [`iter_budget`](Self::iter_budget) on large files.
    pub fn budget(&self, shape: GridShape, filter: &TermFilter) -> Result<BudgetSeries> {
        structured::budget(self.source.as_bytes(), shape, filter)
    }

    /// Decode the whole file as an unstructured head file.
    pub fn unstructured_heads(&self) -> Result<UnstructuredHeadSeries> {
        unstructured::heads(self.source.as_bytes())
    }

    /// Decode the whole file as an unstructured budget file.
    pub fn unstructured_budget(&self, filter: &TermFilter) -> Result<UnstructuredBudgetSeries> {
        unstructured::budget(self.source.as_bytes(), filter)
    }
}
