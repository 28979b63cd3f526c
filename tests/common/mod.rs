//! Synthetic MODFLOW output writer shared by the integration tests and benches.
#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// A 16-byte label, right-justified and space-padded the way MODFLOW writes it.
pub fn label(text: &str) -> [u8; 16] {
    assert!(text.len() <= 16, "label too long: {}", text);
    let mut out = [b' '; 16];
    out[16 - text.len()..].copy_from_slice(text.as_bytes());
    out
}

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_values(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        put_f32(buf, *v);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn head_record(
    buf: &mut Vec<u8>,
    kstp: i32,
    kper: i32,
    pertim: f32,
    totim: f32,
    ncol: i32,
    nrow: i32,
    ilay: i32,
    values: &[f32],
) {
    put_i32(buf, kstp);
    put_i32(buf, kper);
    put_f32(buf, pertim);
    put_f32(buf, totim);
    buf.extend_from_slice(&label("HEAD"));
    put_i32(buf, ncol);
    put_i32(buf, nrow);
    put_i32(buf, ilay);
    put_values(buf, values);
}

#[allow(clippy::too_many_arguments)]
pub fn budget_record(
    buf: &mut Vec<u8>,
    kstp: i32,
    kper: i32,
    text: &str,
    ncol: i32,
    nrow: i32,
    nlay: i32,
    values: &[f32],
) {
    put_i32(buf, kstp);
    put_i32(buf, kper);
    buf.extend_from_slice(&label(text));
    put_i32(buf, ncol);
    put_i32(buf, nrow);
    put_i32(buf, nlay);
    put_values(buf, values);
}

#[allow(clippy::too_many_arguments)]
pub fn unstructured_head_record(
    buf: &mut Vec<u8>,
    kstp: i32,
    kper: i32,
    pertim: f32,
    totim: f32,
    nstrt: i32,
    nndlay: i32,
    ilay: i32,
    values: &[f32],
) {
    put_i32(buf, kstp);
    put_i32(buf, kper);
    put_f32(buf, pertim);
    put_f32(buf, totim);
    buf.extend_from_slice(&label("HEADU"));
    put_i32(buf, nstrt);
    put_i32(buf, nndlay);
    put_i32(buf, ilay);
    put_values(buf, values);
}

#[allow(clippy::too_many_arguments)]
pub fn unstructured_budget_record(
    buf: &mut Vec<u8>,
    kstp: i32,
    kper: i32,
    text: &str,
    nval: i32,
    one: i32,
    icode: i32,
    values: &[f32],
) {
    put_i32(buf, kstp);
    put_i32(buf, kper);
    buf.extend_from_slice(&label(text));
    put_i32(buf, nval);
    put_i32(buf, one);
    put_i32(buf, icode);
    put_values(buf, values);
}

/// Deterministic, distinct values for one array.
pub fn ramp(len: usize, seed: f32) -> Vec<f32> {
    (0..len).map(|i| seed + i as f32 * 0.25).collect()
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
