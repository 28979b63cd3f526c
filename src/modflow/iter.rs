//! Iterators for sequential access to MODFLOW output records.
//!
//! This module provides a layered iterator design:
//!
//! 1. [`RecordScanner`] - Base iterator yielding raw [`Record`]s (typed header +
//!    borrowed payload bytes) for any [`RecordKind`]
//! 2. Per-format iterators that decode payloads into owned arrays:
//!    [`HeadSteps`], [`BudgetTerms`], [`UnstructuredHeadLayers`] and
//!    [`UnstructuredBudgetTerms`]
//!
//! Every iterator yields `Result<_>` and stops after the first error. When an
//! iterator ends without error, the records it read cover the input exactly.
//!
//! # Example
//! ```no_run
//! # use modflow_reader::{GridShape, OutputFile};
//! let file = OutputFile::open("model.hds").unwrap();
//! for step in file.iter_heads(GridShape::new(3, 100, 120)) {
//!     let step = step.unwrap();
//!     println!("{} totim={} mean={:?}", step.key, step.totim, step.data.mean());
//! }
//! ```

use log::{debug, trace};
use ndarray::{Array1, Array3};

use super::format::layout::VALUE_WIDTH;
use super::types::error::{ModflowError, Result};
use super::types::kinds::{
    RecordKind, StructuredBudget, StructuredHead, UnstructuredBudget, UnstructuredHead,
};
use super::types::models::{
    BudgetKey, BudgetTerm, GridShape, HeadStep, RecordHeader, ScanStats, TermFilter,
    UnstructuredBudgetTerm, UnstructuredHeadLayer,
};
use super::utils;

/// One physical record: decoded header plus its still-encoded payload.
#[derive(Debug)]
pub struct Record<'a, K: RecordKind> {
    /// Byte offset of the header in the file.
    pub offset: u64,
    pub header: K::Header,
    pub payload: &'a [u8],
}

impl<K: RecordKind> Record<'_, K> {
    /// Total record size (header + payload) in bytes.
    pub fn size(&self) -> u64 {
        (K::LAYOUT.size() + self.payload.len()) as u64
    }

    /// Number of payload values.
    pub fn len(&self) -> usize {
        self.payload.len() / VALUE_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Decode the payload into owned values.
    pub fn values(&self) -> Vec<f32> {
        utils::read_values(self.payload)
    }
}

enum ScanState<'a, K: RecordKind> {
    /// Read the fixed-size header at the current offset and size the payload.
    ProbeHeader,
    /// Check that header + payload fit in the remaining bytes.
    ReadFullRecord { header: K::Header, payload_len: usize },
    /// Hand the record out and advance past it.
    Emit(Record<'a, K>),
    Done,
}

/// Iterator over the raw records of one file.
///
/// Record boundaries are data-dependent for unstructured files, so every
/// record is probed before it is sized: the scanner never precomputes offsets.
pub struct RecordScanner<'a, K: RecordKind> {
    data: &'a [u8],
    ctx: K::Context,
    offset: usize,
    records: u64,
    state: ScanState<'a, K>,
}

impl<'a, K: RecordKind> RecordScanner<'a, K> {
    pub fn new(data: &'a [u8], ctx: K::Context) -> Self {
        Self {
            data,
            ctx,
            offset: 0,
            records: 0,
            state: ScanState::ProbeHeader,
        }
    }

    /// Records emitted and bytes consumed so far.
    pub fn stats(&self) -> ScanStats {
        ScanStats {
            records: self.records,
            bytes_consumed: self.offset as u64,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

impl<'a, K: RecordKind> Iterator for RecordScanner<'a, K> {
    type Item = Result<Record<'a, K>>;

    fn next(&mut self) -> Option<Self::Item> {
        let header_len = K::LAYOUT.size();
        loop {
            // Any early return leaves the scanner in `Done`.
            match std::mem::replace(&mut self.state, ScanState::Done) {
                ScanState::Done => return None,
                ScanState::ProbeHeader => {
                    let remaining = self.remaining();
                    if remaining == 0 {
                        return None;
                    }
                    if remaining < header_len {
                        return Some(Err(ModflowError::Truncated {
                            kind: K::DEBUG_NAME,
                            offset: self.offset as u64,
                            needed: header_len as u64,
                            available: remaining as u64,
                        }));
                    }
                    let header =
                        K::parse_header(&self.data[self.offset..self.offset + header_len]);
                    let payload_len = match K::payload_values(&header, self.ctx, self.offset as u64)
                        .and_then(|n| payload_bytes::<K>(n, self.offset))
                    {
                        Ok(len) => len,
                        Err(e) => return Some(Err(e)),
                    };
                    trace!(
                        "{} header at offset {}: payload {} bytes",
                        K::DEBUG_NAME, self.offset, payload_len
                    );
                    self.state = ScanState::ReadFullRecord { header, payload_len };
                }
                ScanState::ReadFullRecord { header, payload_len } => {
                    let remaining = self.remaining();
                    let needed = header_len + payload_len;
                    if remaining < needed {
                        return Some(Err(ModflowError::Truncated {
                            kind: K::DEBUG_NAME,
                            offset: self.offset as u64,
                            needed: needed as u64,
                            available: remaining as u64,
                        }));
                    }
                    let start = self.offset + header_len;
                    self.state = ScanState::Emit(Record {
                        offset: self.offset as u64,
                        header,
                        payload: &self.data[start..start + payload_len],
                    });
                }
                ScanState::Emit(record) => {
                    self.offset += header_len + record.payload.len();
                    self.records += 1;
                    self.state = ScanState::ProbeHeader;
                    return Some(Ok(record));
                }
            }
        }
    }
}

fn payload_bytes<K: RecordKind>(values: usize, offset: usize) -> Result<usize> {
    values
        .checked_mul(VALUE_WIDTH)
        .and_then(|n| n.checked_add(K::LAYOUT.size()).map(|_| n))
        .ok_or_else(|| ModflowError::InvalidRecord {
            kind: K::DEBUG_NAME,
            offset: offset as u64,
            reason: format!("payload of {} values overflows", values),
        })
}

/// Iterator over the time steps of a structured head file.
///
/// Each step is `nlay` consecutive layer records sharing one time-step key;
/// the key, `pertim` and `totim` come from the first layer. Layer records
/// must carry `ilay` 1..=nlay in order and the first layer's key.
pub struct HeadSteps<'a> {
    records: RecordScanner<'a, StructuredHead>,
    shape: GridShape,
}

impl<'a> HeadSteps<'a> {
    /// A shape with a zero dimension yields no steps and reads nothing.
    pub fn new(data: &'a [u8], shape: GridShape) -> Self {
        let data = if shape.is_empty() { &[][..] } else { data };
        Self {
            records: RecordScanner::new(data, shape),
            shape,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.records.stats()
    }

    fn layer_record_size(&self) -> u64 {
        let values = self.shape.cells_per_layer() as u64;
        values
            .saturating_mul(VALUE_WIDTH as u64)
            .saturating_add(StructuredHead::LAYOUT.size() as u64)
    }

    /// Checks that a layer record belongs to the step opened by `first`.
    fn check_layer(
        first: &Record<'_, StructuredHead>,
        record: &Record<'_, StructuredHead>,
        layer: usize,
    ) -> Result<()> {
        let expected = layer as i64 + 1;
        if i64::from(record.header.ilay) != expected {
            return Err(ModflowError::DimensionMismatch {
                context: "head record ilay",
                expected,
                found: record.header.ilay.into(),
            });
        }
        if record.header.key() != first.header.key() {
            return Err(ModflowError::InvalidRecord {
                kind: StructuredHead::DEBUG_NAME,
                offset: record.offset,
                reason: format!(
                    "layer {} has time step {}, expected {}",
                    expected,
                    record.header.key(),
                    first.header.key()
                ),
            });
        }
        Ok(())
    }
}

impl Iterator for HeadSteps<'_> {
    type Item = Result<HeadStep>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e)),
        };
        if let Err(e) = Self::check_layer(&first, &first, 0) {
            return Some(Err(e));
        }

        // Grows one layer at a time: `nlay` is the caller's claim, not the file's.
        let mut values = first.values();
        for layer in 1..self.shape.nlay {
            match self.records.next() {
                Some(Ok(record)) => {
                    if let Err(e) = Self::check_layer(&first, &record, layer) {
                        return Some(Err(e));
                    }
                    values.extend(record.values());
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    return Some(Err(ModflowError::Truncated {
                        kind: StructuredHead::DEBUG_NAME,
                        offset: self.records.stats().bytes_consumed,
                        needed: ((self.shape.nlay - layer) as u64)
                            .saturating_mul(self.layer_record_size()),
                        available: 0,
                    }))
                }
            }
        }

        let GridShape { nlay, nrow, ncol } = self.shape;
        let data = match Array3::from_shape_vec((nlay, nrow, ncol), values) {
            Ok(data) => data,
            Err(e) => {
                return Some(Err(ModflowError::InvalidRecord {
                    kind: StructuredHead::DEBUG_NAME,
                    offset: first.offset,
                    reason: e.to_string(),
                }))
            }
        };

        let header = first.header;
        debug!(
            "Head step {} at offset {}: totim={}, {} layers",
            header.key(), first.offset, header.totim, nlay
        );
        Some(Ok(HeadStep {
            key: header.key(),
            pertim: header.pertim,
            totim: header.totim,
            text: header.text,
            data,
        }))
    }
}

/// Iterator over the retained terms of a structured budget file.
///
/// Records excluded by the filter are still consumed; their payload is
/// never decoded.
pub struct BudgetTerms<'a> {
    records: RecordScanner<'a, StructuredBudget>,
    shape: GridShape,
    filter: &'a TermFilter,
}

impl<'a> BudgetTerms<'a> {
    /// A shape with a zero dimension yields no terms and reads nothing.
    pub fn new(data: &'a [u8], shape: GridShape, filter: &'a TermFilter) -> Self {
        let data = if shape.is_empty() { &[][..] } else { data };
        Self {
            records: RecordScanner::new(data, shape),
            shape,
            filter,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.records.stats()
    }
}

impl Iterator for BudgetTerms<'_> {
    type Item = Result<BudgetTerm>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            let header = &record.header;
            if !self.filter.retains(&header.text) {
                debug!("Skipping budget term '{}' {} at offset {}", header.text, header.key(), record.offset);
                continue;
            }

            let GridShape { nlay, nrow, ncol } = self.shape;
            let data = match Array3::from_shape_vec((nlay, nrow, ncol), record.values()) {
                Ok(data) => data,
                Err(e) => {
                    return Some(Err(ModflowError::InvalidRecord {
                        kind: StructuredBudget::DEBUG_NAME,
                        offset: record.offset,
                        reason: e.to_string(),
                    }))
                }
            };
            let key = header.key();
            debug!("Budget term '{}' {} at offset {}", header.text, key, record.offset);
            return Some(Ok(BudgetTerm {
                key,
                text: record.header.text,
                data,
            }));
        }
    }
}

/// Iterator over the layer segments of an unstructured head file.
///
/// Keeps a running concatenation of node values that restarts at every
/// record with `ilay == 1`. Each yielded item carries the state after its own
/// segment, so the last item of a time step holds all of its layers.
pub struct UnstructuredHeadLayers<'a> {
    records: RecordScanner<'a, UnstructuredHead>,
    accumulated: Vec<f32>,
}

impl<'a> UnstructuredHeadLayers<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            records: RecordScanner::new(data, ()),
            accumulated: Vec::new(),
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.records.stats()
    }
}

impl Iterator for UnstructuredHeadLayers<'_> {
    type Item = Result<UnstructuredHeadLayer>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e)),
        };

        if record.header.ilay == 1 {
            trace!("ilay 1 at offset {}: new layer group", record.offset);
            self.accumulated.clear();
        }
        let segment = record.values();
        self.accumulated.extend_from_slice(&segment);

        debug!(
            "Unstructured head layer {} of {} at offset {}: nodes {}..={}, {} accumulated",
            record.header.ilay,
            record.header.key(),
            record.offset,
            record.header.nstrt,
            record.header.nndlay,
            self.accumulated.len()
        );
        Some(Ok(UnstructuredHeadLayer {
            header: record.header,
            segment: Array1::from(segment),
            accumulated: Array1::from(self.accumulated.clone()),
        }))
    }
}

/// Iterator over the retained terms of an unstructured budget file.
pub struct UnstructuredBudgetTerms<'a> {
    records: RecordScanner<'a, UnstructuredBudget>,
    filter: &'a TermFilter,
}

impl<'a> UnstructuredBudgetTerms<'a> {
    pub fn new(data: &'a [u8], filter: &'a TermFilter) -> Self {
        Self {
            records: RecordScanner::new(data, ()),
            filter,
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.records.stats()
    }
}

impl Iterator for UnstructuredBudgetTerms<'_> {
    type Item = Result<UnstructuredBudgetTerm>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            if !self.filter.retains(&record.header.text) {
                debug!(
                    "Skipping unstructured budget term '{}' {} at offset {}",
                    record.header.text,
                    record.header.key(),
                    record.offset
                );
                continue;
            }

            let nval = record.len();
            let data = Array1::from(record.values());
            debug!(
                "Unstructured budget term '{}' {} at offset {}: {} values",
                record.header.text,
                record.header.key(),
                record.offset,
                nval
            );
            let step = record.header.key();
            return Some(Ok(UnstructuredBudgetTerm {
                key: BudgetKey {
                    term: record.header.text,
                    nval,
                    step,
                },
                one: record.header.one,
                icode: record.header.icode,
                data,
            }));
        }
    }
}
