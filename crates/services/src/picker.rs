use rand::Rng;

use quiz_core::select::Picker;

/// Production picker: uniform random over the working pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPicker;

impl UniformPicker {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Picker for UniformPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}
