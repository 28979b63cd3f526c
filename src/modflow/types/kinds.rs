//! Specialization logic for the four record shapes.

use super::error::{ModflowError, Result};
use super::models::{
    GridShape, RecordHeader, StructuredBudgetHeader, StructuredHeadHeader,
    UnstructuredBudgetHeader, UnstructuredHeadHeader,
};
use crate::modflow::format::header;
use crate::modflow::format::layout::{
    RecordLayout, STRUCTURED_BUDGET, STRUCTURED_HEAD, UNSTRUCTURED_BUDGET, UNSTRUCTURED_HEAD,
};

/// A trait that defines how one record shape is laid out and sized.
pub trait RecordKind {
    /// A short name used for debugging, logging and error messages.
    const DEBUG_NAME: &'static str;

    /// Header field table.
    const LAYOUT: &'static RecordLayout;

    type Header: RecordHeader;

    /// What the caller must supply to size a payload.
    /// - `GridShape` for structured files.
    /// - `()` for unstructured files, whose headers are self-describing.
    type Context: Copy;

    fn parse_header(bytes: &[u8]) -> Self::Header;

    /// Number of `f32` payload values following `header`.
    ///
    /// `offset` is the record's position in the file, used for error reporting.
    fn payload_values(header: &Self::Header, ctx: Self::Context, offset: u64) -> Result<usize>;
}

fn grid_values(kind: &'static str, count: Option<usize>, offset: u64) -> Result<usize> {
    count.ok_or_else(|| ModflowError::InvalidRecord {
        kind,
        offset,
        reason: "grid cell count overflows".to_string(),
    })
}

fn check_dimension(context: &'static str, expected: usize, found: i32) -> Result<()> {
    if i64::from(found) != expected as i64 {
        return Err(ModflowError::DimensionMismatch {
            context,
            expected: expected as i64,
            found: found.into(),
        });
    }
    Ok(())
}

/// Zero-cost marker for structured head (`.hds`) records: one layer per record.
#[derive(Debug)]
pub struct StructuredHead;

impl RecordKind for StructuredHead {
    const DEBUG_NAME: &'static str = "structured head";
    const LAYOUT: &'static RecordLayout = &STRUCTURED_HEAD;
    type Header = StructuredHeadHeader;
    type Context = GridShape;

    fn parse_header(bytes: &[u8]) -> Self::Header {
        header::parse_structured_head(bytes)
    }

    fn payload_values(header: &Self::Header, shape: GridShape, offset: u64) -> Result<usize> {
        check_dimension("head record ncol", shape.ncol, header.ncol)?;
        check_dimension("head record nrow", shape.nrow, header.nrow)?;
        grid_values(Self::DEBUG_NAME, shape.checked_cells_per_layer(), offset)
    }
}

/// Zero-cost marker for structured budget (`.cbb`) records: full grid per record.
#[derive(Debug)]
pub struct StructuredBudget;

impl RecordKind for StructuredBudget {
    const DEBUG_NAME: &'static str = "structured budget";
    const LAYOUT: &'static RecordLayout = &STRUCTURED_BUDGET;
    type Header = StructuredBudgetHeader;
    type Context = GridShape;

    fn parse_header(bytes: &[u8]) -> Self::Header {
        header::parse_structured_budget(bytes)
    }

    fn payload_values(header: &Self::Header, shape: GridShape, offset: u64) -> Result<usize> {
        check_dimension("budget record ncol", shape.ncol, header.ncol)?;
        check_dimension("budget record nrow", shape.nrow, header.nrow)?;
        check_dimension("budget record nlay", shape.nlay, header.nlay)?;
        grid_values(Self::DEBUG_NAME, shape.checked_cells(), offset)
    }
}

/// Zero-cost marker for unstructured head records: one node range per record.
#[derive(Debug)]
pub struct UnstructuredHead;

impl RecordKind for UnstructuredHead {
    const DEBUG_NAME: &'static str = "unstructured head";
    const LAYOUT: &'static RecordLayout = &UNSTRUCTURED_HEAD;
    type Header = UnstructuredHeadHeader;
    type Context = ();

    fn parse_header(bytes: &[u8]) -> Self::Header {
        header::parse_unstructured_head(bytes)
    }

    fn payload_values(header: &Self::Header, _ctx: (), offset: u64) -> Result<usize> {
        let n = i64::from(header.nndlay) - i64::from(header.nstrt) + 1;
        usize::try_from(n).map_err(|_| ModflowError::InvalidRecord {
            kind: Self::DEBUG_NAME,
            offset,
            reason: format!(
                "node range nstrt={} nndlay={} is negative",
                header.nstrt, header.nndlay
            ),
        })
    }
}

/// Zero-cost marker for unstructured budget records: `nval` values per record.
#[derive(Debug)]
pub struct UnstructuredBudget;

impl RecordKind for UnstructuredBudget {
    const DEBUG_NAME: &'static str = "unstructured budget";
    const LAYOUT: &'static RecordLayout = &UNSTRUCTURED_BUDGET;
    type Header = UnstructuredBudgetHeader;
    type Context = ();

    fn parse_header(bytes: &[u8]) -> Self::Header {
        header::parse_unstructured_budget(bytes)
    }

    fn payload_values(header: &Self::Header, _ctx: (), offset: u64) -> Result<usize> {
        usize::try_from(header.nval).map_err(|_| ModflowError::InvalidRecord {
            kind: Self::DEBUG_NAME,
            offset,
            reason: format!("negative node count nval={}", header.nval),
        })
    }
}
