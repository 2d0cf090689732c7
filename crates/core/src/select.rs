//! Pluggable selection strategy for the working pool.
//!
//! The production picker (uniform random over `rand`) lives in the services
//! crate; the core only defines the capability so tests can supply
//! deterministic sequences.

/// Picks an index into the working pool.
pub trait Picker {
    /// Return an index in `0..len`. `len` is always at least 1: the session
    /// never consults the picker with an empty pool.
    fn pick(&mut self, len: usize) -> usize;
}

/// Deterministic picker for tests: replays a fixed sequence of indices,
/// then falls back to 0.
#[derive(Debug, Clone, Default)]
pub struct SequencePicker {
    indices: Vec<usize>,
    next: usize,
}

impl SequencePicker {
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, next: 0 }
    }
}

impl Picker for SequencePicker {
    fn pick(&mut self, len: usize) -> usize {
        let index = self.indices.get(self.next).copied().unwrap_or(0);
        self.next += 1;
        index.min(len.saturating_sub(1))
    }
}
