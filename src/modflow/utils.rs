//! Low-level byte reading utilities

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_8;

/// Read a little-endian `i32` at `offset`.
pub fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    LittleEndian::read_i32(&bytes[offset..offset + 4])
}

/// Read a little-endian `f32` at `offset`.
pub fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    LittleEndian::read_f32(&bytes[offset..offset + 4])
}

/// Decode a packed little-endian `f32` payload into owned values.
///
/// `payload.len()` must be a multiple of 4.
pub fn read_values(payload: &[u8]) -> Vec<f32> {
    let mut values = vec![0f32; payload.len() / 4];
    LittleEndian::read_f32_into(payload, &mut values);
    values
}

/// Decode a fixed-width text label.
///
/// Invalid UTF-8 is replaced rather than rejected; surrounding whitespace and
/// NUL padding are stripped.
pub fn decode_label(bytes: &[u8]) -> String {
    let (text, _) = UTF_8.decode_without_bom_handling(bytes);
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_owned()
}
