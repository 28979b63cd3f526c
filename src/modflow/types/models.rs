//! Core data structures for MODFLOW binary output files.
//!
//! This module defines the fundamental types used throughout the library:
//! - Time-step identity and grid dimensions
//! - Decoded record headers, one per record shape
//! - Insertion-ordered output stores and the per-record items yielded by iterators

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use ndarray::{Array1, Array3};

/// Identifies one simulator output snapshot: `(stress_period, time_step)`.
///
/// The file stores `kstp` before `kper`; this key orders them the other way
/// round so that sorting follows simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeStepKey {
    pub stress_period: i32,
    pub time_step: i32,
}

impl TimeStepKey {
    pub fn new(stress_period: i32, time_step: i32) -> Self {
        Self { stress_period, time_step }
    }
}

impl fmt::Display for TimeStepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.stress_period, self.time_step)
    }
}

/// Layer/row/column counts of a structured grid.
///
/// Structured files are not self-describing, so the caller must supply these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
}

impl GridShape {
    pub fn new(nlay: usize, nrow: usize, ncol: usize) -> Self {
        Self { nlay, nrow, ncol }
    }

    /// True when any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.nlay == 0 || self.nrow == 0 || self.ncol == 0
    }

    /// `nrow * ncol`, or `None` on overflow.
    pub fn checked_cells_per_layer(&self) -> Option<usize> {
        self.nrow.checked_mul(self.ncol)
    }

    /// `nlay * nrow * ncol`, or `None` on overflow.
    pub fn checked_cells(&self) -> Option<usize> {
        self.checked_cells_per_layer()?.checked_mul(self.nlay)
    }

    /// Cells in one layer, saturating at `usize::MAX`.
    pub fn cells_per_layer(&self) -> usize {
        self.checked_cells_per_layer().unwrap_or(usize::MAX)
    }

    /// Cells in the whole grid, saturating at `usize::MAX`.
    pub fn cells(&self) -> usize {
        self.checked_cells().unwrap_or(usize::MAX)
    }
}

/// Budget-term allow-list.
///
/// Large budget files can exceed available memory, so callers restrict the
/// decoded terms with `Only`. Records whose label is filtered out are still
/// fully consumed by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TermFilter {
    #[default]
    All,
    Only(HashSet<String>),
}

impl TermFilter {
    /// Builds a filter from a list of labels. An empty list retains everything.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = items.into_iter().map(Into::into).collect();
        if set.is_empty() {
            TermFilter::All
        } else {
            TermFilter::Only(set)
        }
    }

    pub fn retains(&self, label: &str) -> bool {
        match self {
            TermFilter::All => true,
            TermFilter::Only(set) => set.contains(label),
        }
    }
}

/// A map that remembers the order in which keys were first inserted.
///
/// Re-inserting an existing key replaces its value in place, so iteration
/// order always follows first appearance in the file.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a value, returning the previous one if the key was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Record headers
// ---------------------------------------------------------------------------

/// Header of one layer record in a structured head file.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredHeadHeader {
    pub kstp: i32,
    pub kper: i32,
    pub pertim: f32,
    pub totim: f32,
    pub text: String,
    pub ncol: i32,
    pub nrow: i32,
    pub ilay: i32,
}

/// Header of one term record in a structured budget file.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredBudgetHeader {
    pub kstp: i32,
    pub kper: i32,
    pub text: String,
    pub ncol: i32,
    pub nrow: i32,
    pub nlay: i32,
}

/// Header of one layer segment in an unstructured head file.
///
/// The segment covers nodes `nstrt..=nndlay` (1-based, inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredHeadHeader {
    pub kstp: i32,
    pub kper: i32,
    pub pertim: f32,
    pub totim: f32,
    pub text: String,
    pub nstrt: i32,
    pub nndlay: i32,
    pub ilay: i32,
}

/// Header of one term record in an unstructured budget file.
///
/// `one` and `icode` are passed through uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredBudgetHeader {
    pub kstp: i32,
    pub kper: i32,
    pub text: String,
    pub nval: i32,
    pub one: i32,
    pub icode: i32,
}

/// Access to the time-step identity shared by every header variant.
pub trait RecordHeader: fmt::Debug + Clone {
    fn key(&self) -> TimeStepKey;
    fn text(&self) -> &str;
}

macro_rules! impl_record_header {
    ($($ty:ty),+) => {
        $(impl RecordHeader for $ty {
            fn key(&self) -> TimeStepKey {
                TimeStepKey::new(self.kper, self.kstp)
            }

            fn text(&self) -> &str {
                &self.text
            }
        })+
    };
}

impl_record_header!(
    StructuredHeadHeader,
    StructuredBudgetHeader,
    UnstructuredHeadHeader,
    UnstructuredBudgetHeader
);

// ---------------------------------------------------------------------------
// Iterator items
// ---------------------------------------------------------------------------

/// All layers of one time step from a structured head file.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadStep {
    pub key: TimeStepKey,
    pub pertim: f32,
    /// Cumulative time of the first layer record.
    pub totim: f32,
    pub text: String,
    /// Shape `(nlay, nrow, ncol)`.
    pub data: Array3<f32>,
}

/// One retained term record from a structured budget file.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTerm {
    pub key: TimeStepKey,
    pub text: String,
    /// Shape `(nlay, nrow, ncol)`.
    pub data: Array3<f32>,
}

/// One layer segment from an unstructured head file, with the running
/// concatenation of every segment since the last `ilay == 1` record.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredHeadLayer {
    pub header: UnstructuredHeadHeader,
    pub segment: Array1<f32>,
    pub accumulated: Array1<f32>,
}

/// Identity of an unstructured budget array. The node count is part of the
/// identity because one term can be reported at different sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub term: String,
    pub nval: usize,
    pub step: TimeStepKey,
}

/// One retained term record from an unstructured budget file.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredBudgetTerm {
    pub key: BudgetKey,
    pub one: i32,
    pub icode: i32,
    pub data: Array1<f32>,
}

// ---------------------------------------------------------------------------
// Decoder outputs
// ---------------------------------------------------------------------------

/// How much of the input a completed scan covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Physical records read, including filtered-out ones.
    pub records: u64,
    /// Equals the file size after a successful scan.
    pub bytes_consumed: u64,
}

/// Decoded structured head file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadSeries {
    pub heads: OrderedMap<TimeStepKey, Array3<f32>>,
    /// Cumulative simulation time of each time step, in file order.
    pub totim: Vec<f32>,
    pub stats: ScanStats,
}

/// Decoded structured budget file: term label -> time step -> flux array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSeries {
    pub terms: OrderedMap<String, OrderedMap<TimeStepKey, Array3<f32>>>,
    pub stats: ScanStats,
}

/// Decoded unstructured head file: one flat node array per time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredHeadSeries {
    pub heads: OrderedMap<TimeStepKey, Array1<f32>>,
    pub stats: ScanStats,
}

/// Decoded unstructured budget file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredBudgetSeries {
    pub terms: OrderedMap<BudgetKey, Array1<f32>>,
    pub stats: ScanStats,
}
