//! Typed header extraction.
//!
//! Each function takes exactly one header's worth of bytes (see
//! [`layout`](super::layout)) and walks the fields in declared order.

use log::trace;

use super::layout::{
    FieldReader, STRUCTURED_BUDGET, STRUCTURED_HEAD, UNSTRUCTURED_BUDGET, UNSTRUCTURED_HEAD,
};
use crate::modflow::types::models::{
    StructuredBudgetHeader, StructuredHeadHeader, UnstructuredBudgetHeader,
    UnstructuredHeadHeader,
};

pub fn parse_structured_head(bytes: &[u8]) -> StructuredHeadHeader {
    let mut r = FieldReader::new(&STRUCTURED_HEAD, bytes);
    let header = StructuredHeadHeader {
        kstp: r.int("kstp"),
        kper: r.int("kper"),
        pertim: r.real("pertim"),
        totim: r.real("totim"),
        text: r.text("text"),
        ncol: r.int("ncol"),
        nrow: r.int("nrow"),
        ilay: r.int("ilay"),
    };
    trace!("Parsed structured head header: {:?}", header);
    header
}

pub fn parse_structured_budget(bytes: &[u8]) -> StructuredBudgetHeader {
    let mut r = FieldReader::new(&STRUCTURED_BUDGET, bytes);
    let header = StructuredBudgetHeader {
        kstp: r.int("kstp"),
        kper: r.int("kper"),
        text: r.text("text"),
        ncol: r.int("ncol"),
        nrow: r.int("nrow"),
        nlay: r.int("nlay"),
    };
    trace!("Parsed structured budget header: {:?}", header);
    header
}

pub fn parse_unstructured_head(bytes: &[u8]) -> UnstructuredHeadHeader {
    let mut r = FieldReader::new(&UNSTRUCTURED_HEAD, bytes);
    let header = UnstructuredHeadHeader {
        kstp: r.int("kstp"),
        kper: r.int("kper"),
        pertim: r.real("pertim"),
        totim: r.real("totim"),
        text: r.text("text"),
        nstrt: r.int("nstrt"),
        nndlay: r.int("nndlay"),
        ilay: r.int("ilay"),
    };
    trace!("Parsed unstructured head header: {:?}", header);
    header
}

pub fn parse_unstructured_budget(bytes: &[u8]) -> UnstructuredBudgetHeader {
    let mut r = FieldReader::new(&UNSTRUCTURED_BUDGET, bytes);
    let header = UnstructuredBudgetHeader {
        kstp: r.int("kstp"),
        kper: r.int("kper"),
        text: r.text("text"),
        nval: r.int("nval"),
        one: r.int("one"),
        icode: r.int("icode"),
    };
    trace!("Parsed unstructured budget header: {:?}", header);
    header
}
