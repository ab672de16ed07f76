//! Test RNG — scripted `DeterministicRng` implementations for tests.

use std::collections::VecDeque;

use branchtale_core::rng::DeterministicRng;

/// Always answers the low end of the range, so scenario selection picks the
/// first scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// Answers from a queue of scripted values.
///
/// # Panics
///
/// Draws panic once the queue is empty or when a scripted value falls outside
/// the requested range, so a test that picks more scenarios than it scripted
/// fails loudly.
#[derive(Debug, Default)]
pub struct SequenceRng {
    values: VecDeque<u32>,
}

impl SequenceRng {
    /// Create an RNG that will answer `values` in order.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let value = self
            .values
            .pop_front()
            .unwrap_or_else(|| panic!("SequenceRng exhausted (range {min}..={max})"));
        assert!(
            (min..=max).contains(&value),
            "scripted value {value} outside {min}..={max}"
        );
        value
    }
}
