//! Core MODFLOW output reader module

pub mod decode;
pub mod format;
pub mod iter;
pub mod reader;
pub mod source;
pub mod types;
mod utils;

use std::path::Path;

use log::debug;

pub use reader::OutputFile;
pub use types::error::{ModflowError, Result};
use types::models::*;

/// Read a structured head file.
///
/// An empty `path` or a `shape` with any zero dimension returns an empty
/// series without touching the filesystem.
///
/// # Errors
/// Returns an error if the file cannot be opened, a record is truncated,
/// bytes are left over after the last record, or a record header declares a
/// different grid shape.
pub fn read_heads(path: impl AsRef<Path>, shape: GridShape) -> Result<HeadSeries> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || shape.is_empty() {
        debug!("Nothing to read: path={:?}, shape={:?}", path, shape);
        return Ok(HeadSeries::default());
    }
    OutputFile::open(path)?.heads(shape)
}

/// Read a structured budget file, keeping only the terms `filter` retains.
///
/// Short-circuits like [`read_heads`].
pub fn read_budget(path: impl AsRef<Path>, shape: GridShape, filter: &TermFilter) -> Result<BudgetSeries> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || shape.is_empty() {
        debug!("Nothing to read: path={:?}, shape={:?}", path, shape);
        return Ok(BudgetSeries::default());
    }
    OutputFile::open(path)?.budget(shape, filter)
}

/// Read an unstructured head file.
pub fn read_unstructured_heads(path: impl AsRef<Path>) -> Result<UnstructuredHeadSeries> {
    OutputFile::open(path)?.unstructured_heads()
}

/// Read an unstructured budget file, keeping only the terms `filter` retains.
pub fn read_unstructured_budget(path: impl AsRef<Path>, filter: &TermFilter) -> Result<UnstructuredBudgetSeries> {
    OutputFile::open(path)?.unstructured_budget(filter)
}
