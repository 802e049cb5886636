//! Engine configuration and step pacing.

use std::time::Duration;

use algopiece_model::{AlgorithmId, SequenceConfig};

use crate::controls::{DEFAULT_SPEED, MAX_SPEED};

/// How long the pause after an emission lasts relative to a full step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    /// A whole step: comparisons, visits, relaxations
    Full,
    /// Half a step: swaps, writes, frontier pushes
    Half,
}

/// Maps the speed percentage to a per-step delay.
///
/// `delay = (100 - speed) * per_percent + floor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProfile {
    pub per_percent: Duration,
    pub floor: Duration,
}

impl DelayProfile {
    pub const fn from_millis(per_percent: u64, floor: u64) -> Self {
        Self {
            per_percent: Duration::from_millis(per_percent),
            floor: Duration::from_millis(floor),
        }
    }

    pub const ZERO: Self = Self::from_millis(0, 0);

    /// Delay for one step at `speed` percent.
    pub fn duration(&self, speed: u8, beat: Beat) -> Duration {
        let slowdown = u32::from(MAX_SPEED - speed.min(MAX_SPEED));
        let full = self.per_percent * slowdown + self.floor;
        match beat {
            Beat::Full => full,
            Beat::Half => full / 2,
        }
    }
}

/// Delay profiles per algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub sort: DelayProfile,
    pub linear_search: DelayProfile,
    pub binary_search: DelayProfile,
    pub graph: DelayProfile,
    /// How often a paused run re-checks the pause flag.
    pub pause_poll: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sort: DelayProfile::from_millis(5, 50),
            linear_search: DelayProfile::from_millis(5, 100),
            binary_search: DelayProfile::from_millis(5, 150),
            graph: DelayProfile::from_millis(15, 200),
            pause_poll: Duration::from_millis(100),
        }
    }
}

impl TimingConfig {
    /// No delays at all; the pause gate still polls every millisecond.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            sort: DelayProfile::ZERO,
            linear_search: DelayProfile::ZERO,
            binary_search: DelayProfile::ZERO,
            graph: DelayProfile::ZERO,
            pause_poll: Duration::from_millis(1),
        }
    }

    pub fn profile(&self, algorithm: AlgorithmId) -> DelayProfile {
        match algorithm {
            AlgorithmId::LinearSearch => self.linear_search,
            AlgorithmId::BinarySearch => self.binary_search,
            AlgorithmId::Bfs | AlgorithmId::Dfs | AlgorithmId::Dijkstra => self.graph,
            AlgorithmId::BubbleSort
            | AlgorithmId::InsertionSort
            | AlgorithmId::MergeSort
            | AlgorithmId::QuickSort => self.sort,
        }
    }
}

/// Configuration for a [`Playback`](crate::Playback).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for array generation and search targets; entropy when `None`
    pub seed: Option<u64>,
    /// Shape of generated arrays
    pub sequence: SequenceConfig,
    /// Step delays
    pub timing: TimingConfig,
    /// Initial speed percentage
    pub default_speed: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sequence: SequenceConfig::default(),
            timing: TimingConfig::default(),
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl EngineConfig {
    /// Use a fixed seed so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_sequence(mut self, sequence: SequenceConfig) -> Self {
        self.sequence = sequence;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_default_speed(mut self, speed: u8) -> Self {
        self.default_speed = speed;
        self
    }
}
