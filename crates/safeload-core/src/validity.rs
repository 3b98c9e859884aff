use serde::{Deserialize, Serialize};

/// Observed state of a single index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Validity {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl Validity {
    pub fn is_resolved(self) -> bool {
        self != Validity::Unknown
    }
}

/// Per-index validity flags for a collection of fixed length.
///
/// An entry moves from `Unknown` to `Valid` or `Invalid` once and then stays
/// there until [`ValidityCache::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityCache {
    states: Vec<Validity>,
    num_valid: usize,
    num_invalid: usize,
}

impl ValidityCache {
    pub fn new(len: usize) -> Self {
        ValidityCache {
            states: vec![Validity::Unknown; len],
            num_valid: 0,
            num_invalid: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State of `index`; out-of-range indices read as `Unknown`.
    pub fn get(&self, index: usize) -> Validity {
        self.states.get(index).copied().unwrap_or_default()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.get(index) == Validity::Valid
    }

    pub fn is_invalid(&self, index: usize) -> bool {
        self.get(index) == Validity::Invalid
    }

    /// Resolve `index` to `Valid`. Returns false if it was already resolved.
    pub fn mark_valid(&mut self, index: usize) -> bool {
        self.resolve(index, Validity::Valid)
    }

    /// Resolve `index` to `Invalid`. Returns false if it was already resolved.
    pub fn mark_invalid(&mut self, index: usize) -> bool {
        self.resolve(index, Validity::Invalid)
    }

    fn resolve(&mut self, index: usize, state: Validity) -> bool {
        match self.states.get_mut(index) {
            Some(slot) if *slot == Validity::Unknown => {
                *slot = state;
                match state {
                    Validity::Valid => self.num_valid += 1,
                    Validity::Invalid => self.num_invalid += 1,
                    Validity::Unknown => {}
                }
                true
            }
            _ => false,
        }
    }

    pub fn num_valid(&self) -> usize {
        self.num_valid
    }

    pub fn num_invalid(&self) -> usize {
        self.num_invalid
    }

    pub fn num_examined(&self) -> usize {
        self.num_valid + self.num_invalid
    }

    /// True once every index has been resolved.
    pub fn is_complete(&self) -> bool {
        self.num_examined() == self.states.len()
    }

    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices_in(Validity::Valid)
    }

    pub fn invalid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices_in(Validity::Invalid)
    }

    fn indices_in(&self, state: Validity) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == state)
            .map(|(i, _)| i)
    }

    /// The `n`-th valid index in ascending order.
    pub fn nth_valid(&self, n: usize) -> Option<usize> {
        self.valid_indices().nth(n)
    }

    /// Forget every resolution. A new length may be supplied if the
    /// underlying collection changed size.
    pub fn reset(&mut self, len: usize) {
        self.states.clear();
        self.states.resize(len, Validity::Unknown);
        self.num_valid = 0;
        self.num_invalid = 0;
    }
}
