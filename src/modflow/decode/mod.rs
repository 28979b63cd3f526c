//! Decoders that fold a whole file into an in-memory output store.
//!
//! These operate on byte slices; [`OutputFile`](crate::OutputFile) and the
//! `read_*` functions map a file and delegate here.

pub mod structured;
pub mod unstructured;
