//! # Record Layouts
//!
//! Every record variant is described here as an explicit, ordered list of
//! `(name, type)` fields. Offsets are the running sum of field widths with no
//! padding between fields, matching how the simulator writes them. Headers
//! are never decoded through a native struct: the field readers below pull
//! each value out of the byte slice at its computed offset.
//!
//! ```text
//! structured head      kstp kper pertim totim text[16] ncol nrow  ilay  | f32 * nrow*ncol
//! structured budget    kstp kper text[16]  ncol nrow nlay               | f32 * nlay*nrow*ncol
//! unstructured head    kstp kper pertim totim text[16] nstrt nndlay ilay | f32 * (nndlay-nstrt+1)
//! unstructured budget  kstp kper text[16]  nval one icode               | f32 * nval
//! ```

use crate::modflow::utils;

/// Width of one payload value in bytes.
pub const VALUE_WIDTH: usize = 4;

/// Primitive type of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 4-byte little-endian signed integer.
    Int32,
    /// 4-byte little-endian IEEE float.
    Float32,
    /// 16-byte fixed-width text label.
    Text16,
}

impl FieldType {
    pub const fn width(self) -> usize {
        match self {
            FieldType::Int32 | FieldType::Float32 => 4,
            FieldType::Text16 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn int(name: &'static str) -> Field {
    Field { name, ty: FieldType::Int32 }
}

const fn real(name: &'static str) -> Field {
    Field { name, ty: FieldType::Float32 }
}

const fn text(name: &'static str) -> Field {
    Field { name, ty: FieldType::Text16 }
}

/// Ordered field list of one record header.
#[derive(Debug)]
pub struct RecordLayout {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl RecordLayout {
    /// Header size in bytes: the plain sum of field widths.
    pub const fn size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].ty.width();
            i += 1;
        }
        total
    }

    /// Byte offset of the named field from the start of the record.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for field in self.fields {
            if field.name == name {
                return Some(offset);
            }
            offset += field.ty.width();
        }
        None
    }
}

pub const STRUCTURED_HEAD: RecordLayout = RecordLayout {
    name: "structured head",
    fields: &[
        int("kstp"),
        int("kper"),
        real("pertim"),
        real("totim"),
        text("text"),
        int("ncol"),
        int("nrow"),
        int("ilay"),
    ],
};

pub const STRUCTURED_BUDGET: RecordLayout = RecordLayout {
    name: "structured budget",
    fields: &[
        int("kstp"),
        int("kper"),
        text("text"),
        int("ncol"),
        int("nrow"),
        int("nlay"),
    ],
};

pub const UNSTRUCTURED_HEAD: RecordLayout = RecordLayout {
    name: "unstructured head",
    fields: &[
        int("kstp"),
        int("kper"),
        real("pertim"),
        real("totim"),
        text("text"),
        int("nstrt"),
        int("nndlay"),
        int("ilay"),
    ],
};

pub const UNSTRUCTURED_BUDGET: RecordLayout = RecordLayout {
    name: "unstructured budget",
    fields: &[
        int("kstp"),
        int("kper"),
        text("text"),
        int("nval"),
        int("one"),
        int("icode"),
    ],
};

/// Sequential reader over a header slice that walks the layout's fields in order.
///
/// The slice must be exactly `layout.size()` bytes long; the scanner
/// guarantees this before handing headers out.
pub struct FieldReader<'a> {
    layout: &'static RecordLayout,
    bytes: &'a [u8],
    index: usize,
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(layout: &'static RecordLayout, bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), layout.size(), "{} header slice", layout.name);
        Self { layout, bytes, index: 0, offset: 0 }
    }

    fn advance(&mut self, name: &str, ty: FieldType) -> usize {
        let field = &self.layout.fields[self.index];
        debug_assert_eq!(field.name, name, "{} field order", self.layout.name);
        debug_assert_eq!(field.ty, ty, "{} field type", self.layout.name);
        let at = self.offset;
        self.offset += ty.width();
        self.index += 1;
        at
    }

    pub fn int(&mut self, name: &str) -> i32 {
        let at = self.advance(name, FieldType::Int32);
        utils::read_i32(self.bytes, at)
    }

    pub fn real(&mut self, name: &str) -> f32 {
        let at = self.advance(name, FieldType::Float32);
        utils::read_f32(self.bytes, at)
    }

    pub fn text(&mut self, name: &str) -> String {
        let at = self.advance(name, FieldType::Text16);
        utils::decode_label(&self.bytes[at..at + FieldType::Text16.width()])
    }
}
