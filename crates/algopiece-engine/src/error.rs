//! Error types for the playback engine.

use algopiece_model::{AlgorithmId, ParseError};
use thiserror::Error;

use crate::playback::PlaybackState;

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the playback controller.
///
/// Superseded runs are not errors; their pending work is dropped silently.
#[derive(Debug, Error)]
pub enum Error {
    /// The custom edge list was malformed; nothing was changed.
    #[error("invalid custom graph: {0}")]
    Parse(#[from] ParseError),

    /// The controller is in the wrong state for the requested operation.
    #[error("invalid playback state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: PlaybackState,
    },

    /// Speed must be a percentage in `10..=100`.
    #[error("speed {0}% is outside 10..=100")]
    InvalidSpeed(u8),

    /// A custom graph was supplied for an array algorithm.
    #[error("{0} does not run on a graph")]
    GraphNotApplicable(AlgorithmId),
}
