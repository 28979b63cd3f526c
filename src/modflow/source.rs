//! Read-only memory-mapped view of an output file.

use std::fs::File;
use std::path::Path;

use log::debug;
use memmap2::Mmap;

use super::types::error::Result;

/// A file mapped read-only into memory.
///
/// Pages are loaded by the OS on demand, so files larger than RAM can be
/// scanned record by record. Empty files are not mapped.
#[derive(Debug)]
pub struct MappedFile {
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();
        if len == 0 {
            debug!("{} is empty, not mapping", path.as_ref().display());
            return Ok(Self { mmap: None });
        }
        // SAFETY: the mapping is read-only; the input is treated as immutable
        // for the lifetime of the reader.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap: Some(mmap) })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}
