//! Foundational data structures, error types, and record kind definitions.

pub mod error;
pub mod kinds;
pub mod models;
