//! Random input arrays for the sorting and searching algorithms.

use rand::Rng;

/// Shape of a generated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceConfig {
    /// Number of elements
    pub len: usize,
    /// Smallest value (inclusive)
    pub min: i64,
    /// Largest value (inclusive)
    pub max: i64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            len: 15,
            min: 10,
            max: 99,
        }
    }
}

/// Draw `config.len` values uniformly from `config.min..=config.max`.
///
/// An inverted range collapses to `min`.
pub fn random_sequence<R: Rng + ?Sized>(config: &SequenceConfig, rng: &mut R) -> Vec<i64> {
    let max = config.max.max(config.min);
    (0..config.len)
        .map(|_| rng.gen_range(config.min..=max))
        .collect()
}
