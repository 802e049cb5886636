//! AlgoPiece Playback Engine
//!
//! Runs classic sorting, searching and graph algorithms one visible step at a
//! time, with pause, resume, speed control and reset.
//!
//! # Architecture
//!
//! - **Runners**: one per algorithm, each driving a private working copy of
//!   its input and emitting a [`Snapshot`] after every meaningful change
//! - **Pacer**: the step boundary. Waits at the pause gate, publishes the
//!   snapshot if the run is still current, then sleeps for the speed-derived
//!   delay
//! - **Run tokens**: a single epoch decides which run is authoritative; reset
//!   and restart advance it, which cancels pending delays and silences the
//!   superseded runner
//! - **Playback**: the state machine that owns the epoch and the controls
//!
//! # Usage
//!
//! ```ignore
//! let recorder = Recorder::new();
//! let playback = Playback::new(EngineConfig::default(), recorder.clone());
//! playback.start(AlgorithmId::Dijkstra, Some("0-1-4,0-2-2,2-1-1"))?;
//! playback.settled().await;
//! ```

mod board;
mod config;
mod controls;
mod delay;
mod error;
mod observer;
mod pacer;
mod playback;
mod runner;
mod snapshot;
mod token;

pub use config::{Beat, DelayProfile, EngineConfig, TimingConfig};
pub use controls::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
pub use error::{Error, Result};
pub use observer::{Observed, Observer, Recorder};
pub use playback::{ModelSnapshot, Playback, PlaybackState, PlaybackStatus};
pub use snapshot::{ArrayView, Distance, GraphView, Snapshot, View};
pub use token::RunId;

pub use algopiece_model::{AlgorithmId, GraphModel, NodeId, ParseError};
