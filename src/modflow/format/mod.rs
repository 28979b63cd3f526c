//! Binary layout layer for MODFLOW output files.
//!
//! - [`layout`]: ordered field tables and byte-exact header sizes
//! - [`header`]: typed header extraction from a header slice
//!
//! ```text
//! File Structure (all four variants):
//! ┌────────────────────┐
//! │ header │ payload   │ ← record 0
//! ├────────────────────┤
//! │ header │ payload   │ ← record 1, starts where record 0 ends
//! ├────────────────────┤
//! │        ...         │
//! └────────────────────┘  ← last record ends exactly at file size
//! ```

pub mod header;
pub mod layout;
