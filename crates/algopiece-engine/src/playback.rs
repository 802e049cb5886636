//! Playback controller.
//!
//! State machine: Idle -> Running -> (Paused <-> Running) -> Completed, with
//! reset returning to Idle from anywhere. The controller owns the run epoch
//! and the pause flag; the active runner owns its working copy of the input
//! and reaches the outside world only through its [`Pacer`].
//!
//! Locks are always taken session first, epoch second. The board lock is
//! innermost.

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use algopiece_model::{parse_edge_list, random_sequence, AlgorithmId, GraphModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::controls::Controls;
use crate::delay::Halted;
use crate::error::{Error, Result};
use crate::observer::Observer;
use crate::pacer::Pacer;
use crate::runner::{self, Workload};
use crate::snapshot::{ArrayView, GraphView, View};
use crate::token::{Epoch, RunId};

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl PlaybackState {
    /// Whether a new run may be started from this state.
    pub fn is_settled(&self) -> bool {
        matches!(self, PlaybackState::Idle | PlaybackState::Completed)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Running => "running",
            PlaybackState::Paused => "paused",
            PlaybackState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub algorithm: Option<AlgorithmId>,
    pub run: Option<RunId>,
    /// Speed percentage, 10..=100
    pub speed: u8,
    pub paused: bool,
    /// Snapshots published by the current run
    pub steps: u64,
}

/// The inputs the next run will copy, and what the board shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub sequence: Vec<i64>,
    /// The working copy binary search runs on
    pub sorted_sequence: Vec<i64>,
    pub graph: GraphModel,
    /// `false` while the built-in graph is installed
    pub custom_graph: bool,
    pub view: View,
}

struct Session {
    state: PlaybackState,
    algorithm: Option<AlgorithmId>,
    run: Option<RunId>,
    sequence: Vec<i64>,
    /// Set by `load_sequence`; a pinned sequence survives reset.
    pinned: bool,
    graph: Arc<GraphModel>,
    custom_graph: bool,
    /// Last algorithm started; survives reset so the idle board keeps its kind.
    focus: Option<AlgorithmId>,
    rng: StdRng,
}

impl Session {
    /// The array `algorithm` would start from.
    fn working_copy(&self, algorithm: Option<AlgorithmId>) -> Vec<i64> {
        let mut values = self.sequence.clone();
        if algorithm.is_some_and(|a| a.requires_sorted_input()) {
            values.sort_unstable();
        }
        values
    }

    /// The model as the focused algorithm would see it before its first step.
    fn idle_view(&self) -> View {
        match self.focus {
            Some(algorithm) if algorithm.is_graph() => View::Graph(GraphView::idle(
                &self.graph,
                algorithm == AlgorithmId::Dijkstra,
            )),
            focus => View::Array(ArrayView::idle(self.working_copy(focus))),
        }
    }
}

struct Shared {
    config: EngineConfig,
    session: Mutex<Session>,
    epoch: Arc<Epoch>,
    controls: Arc<Controls>,
    observer: Arc<dyn Observer>,
    board: Arc<Board>,
    state_tx: watch::Sender<PlaybackState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, session: &mut Session, next: PlaybackState) {
        session.state = next;
        self.state_tx.send_replace(next);
    }

    /// Show the idle view of the current model and tell the observer.
    fn clear_board(&self, session: &Session) {
        let view = session.idle_view();
        self.board.show(view.clone());
        self.observer.on_cleared(&view);
    }

    /// Called by the runner task once its runner returns.
    fn finish(&self, run: RunId, algorithm: AlgorithmId, outcome: std::result::Result<View, Halted>) {
        if outcome.is_err() {
            debug!(%run, %algorithm, "run superseded");
            return;
        }

        let mut session = self.lock();
        if self.epoch.current() != Some(run) {
            debug!(%run, %algorithm, "finished run is stale");
            return;
        }
        if matches!(session.state, PlaybackState::Running | PlaybackState::Paused) {
            self.controls.gate.resume();
            self.transition(&mut session, PlaybackState::Completed);
            info!(
                %run,
                %algorithm,
                steps = self.controls.emitted.load(Ordering::SeqCst),
                "run complete"
            );
        }
    }
}

/// Drives one algorithm run at a time and publishes its snapshots to an
/// [`Observer`].
///
/// Runs execute on the ambient tokio runtime, so [`Playback::start`] must be
/// called from within one. Dropping the controller supersedes any active run.
///
/// ```ignore
/// let recorder = Recorder::new();
/// let playback = Playback::new(EngineConfig::default().with_seed(7), recorder.clone());
/// playback.start(AlgorithmId::BubbleSort, None)?;
/// playback.settled().await;
/// ```
pub struct Playback {
    shared: Arc<Shared>,
}

impl Playback {
    pub fn new(config: EngineConfig, observer: impl Observer) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sequence = random_sequence(&config.sequence, &mut rng);
        let controls = Controls::new(config.timing.pause_poll, config.default_speed);
        let (state_tx, _) = watch::channel(PlaybackState::Idle);

        let session = Session {
            state: PlaybackState::Idle,
            algorithm: None,
            run: None,
            sequence,
            pinned: false,
            graph: Arc::new(GraphModel::default_graph()),
            custom_graph: false,
            focus: None,
            rng,
        };
        let board = Board::new(session.idle_view());

        Self {
            shared: Arc::new(Shared {
                config,
                session: Mutex::new(session),
                epoch: Epoch::new(),
                controls: Arc::new(controls),
                observer: Arc::new(observer),
                board: Arc::new(board),
                state_tx,
            }),
        }
    }

    /// Start `algorithm` on a fresh copy of the current model.
    ///
    /// `custom_graph` replaces the graph before starting and is only accepted
    /// for graph algorithms. A graph that fails to parse leaves everything as
    /// it was.
    pub fn start(&self, algorithm: AlgorithmId, custom_graph: Option<&str>) -> Result<RunId> {
        let shared = &self.shared;
        let mut session = shared.lock();

        if !session.state.is_settled() {
            return Err(Error::InvalidState {
                expected: "idle or completed",
                actual: session.state,
            });
        }

        if let Some(text) = custom_graph {
            if !algorithm.is_graph() {
                return Err(Error::GraphNotApplicable(algorithm));
            }
            let graph = parse_edge_list(text).map_err(|err| {
                warn!(%algorithm, error = %err, "rejected custom graph");
                err
            })?;
            session.graph = Arc::new(graph);
            session.custom_graph = true;
        }

        let values = session.working_copy(Some(algorithm));
        let target = if algorithm.is_search() && !values.is_empty() {
            let index = session.rng.gen_range(0..values.len());
            Some(values[index])
        } else {
            None
        };
        let workload = Workload {
            values,
            target,
            graph: Arc::clone(&session.graph),
        };

        shared.controls.gate.resume();
        shared.controls.emitted.store(0, Ordering::SeqCst);
        let token = shared.epoch.mint();
        let run = token.id();
        let mut pacer = Pacer::new(
            token,
            algorithm,
            Arc::clone(&shared.controls),
            Arc::clone(&shared.observer),
            Arc::clone(&shared.board),
            shared.config.timing.profile(algorithm),
        );

        session.focus = Some(algorithm);
        shared.board.show(session.idle_view());
        session.algorithm = Some(algorithm);
        session.run = Some(run);
        shared.transition(&mut session, PlaybackState::Running);
        info!(%run, %algorithm, ?target, "run started");

        let task_shared = Arc::clone(shared);
        tokio::spawn(async move {
            let outcome = runner::run(algorithm, workload, &mut pacer).await;
            task_shared.finish(pacer.run_id(), algorithm, outcome);
        });

        Ok(run)
    }

    pub fn pause(&self) -> Result<()> {
        let mut session = self.shared.lock();
        if session.state != PlaybackState::Running {
            return Err(Error::InvalidState {
                expected: "running",
                actual: session.state,
            });
        }
        self.shared.controls.gate.pause();
        self.shared.transition(&mut session, PlaybackState::Paused);
        debug!(run = ?session.run, "paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        let mut session = self.shared.lock();
        if session.state != PlaybackState::Paused {
            return Err(Error::InvalidState {
                expected: "paused",
                actual: session.state,
            });
        }
        self.shared.controls.gate.resume();
        self.shared.transition(&mut session, PlaybackState::Running);
        debug!(run = ?session.run, "resumed");
        Ok(())
    }

    /// Abandon the current run, if any, and return to Idle.
    ///
    /// The runner is released from any pending delay or pause immediately and
    /// publishes nothing further. A random sequence is redrawn; a loaded
    /// sequence and the installed graph are kept. The board is cleared and the
    /// observer receives the idle view.
    pub fn reset(&self) {
        let mut session = self.shared.lock();
        self.reset_locked(&mut session);
        self.shared.clear_board(&session);
    }

    fn reset_locked(&self, session: &mut Session) {
        let shared = &self.shared;
        shared.epoch.invalidate();
        shared.controls.gate.resume();
        shared.controls.emitted.store(0, Ordering::SeqCst);

        if !session.pinned {
            let Session { sequence, rng, .. } = &mut *session;
            *sequence = random_sequence(&shared.config.sequence, rng);
        }
        let abandoned = session.run.take();
        session.algorithm = None;
        shared.transition(session, PlaybackState::Idle);
        info!(run = ?abandoned, "playback reset");
    }

    /// Takes effect from the next delay onward.
    pub fn set_speed(&self, percent: u8) -> Result<()> {
        if !self.shared.controls.speed.set(percent) {
            return Err(Error::InvalidSpeed(percent));
        }
        debug!(percent, "speed changed");
        Ok(())
    }

    /// Parse and install a custom graph, resetting to Idle.
    pub fn load_graph(&self, text: &str) -> Result<()> {
        let graph = parse_edge_list(text).map_err(|err| {
            warn!(error = %err, "rejected custom graph");
            err
        })?;
        let mut session = self.shared.lock();
        self.reset_locked(&mut session);
        info!(nodes = graph.node_count(), edges = graph.edges().len(), "custom graph installed");
        session.graph = Arc::new(graph);
        session.custom_graph = true;
        self.shared.clear_board(&session);
        Ok(())
    }

    /// Use `values` for every following array run, resetting to Idle.
    pub fn load_sequence(&self, values: Vec<i64>) {
        let mut session = self.shared.lock();
        session.pinned = true;
        self.reset_locked(&mut session);
        session.sequence = values;
        self.shared.clear_board(&session);
    }

    pub fn status(&self) -> PlaybackStatus {
        let session = self.shared.lock();
        let controls = &self.shared.controls;
        PlaybackStatus {
            state: session.state,
            algorithm: session.algorithm,
            run: session.run,
            speed: controls.speed.get(),
            paused: controls.gate.is_paused(),
            steps: controls.emitted.load(Ordering::SeqCst),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.lock().state
    }

    pub fn model(&self) -> ModelSnapshot {
        let session = self.shared.lock();
        ModelSnapshot {
            sequence: session.sequence.clone(),
            sorted_sequence: session.working_copy(Some(AlgorithmId::BinarySearch)),
            graph: GraphModel::clone(&session.graph),
            custom_graph: session.custom_graph,
            view: self.shared.board.current(),
        }
    }

    /// What a renderer should show now: the latest view of the current run,
    /// or the idle view of the model after a reset or a model change.
    pub fn view(&self) -> View {
        self.shared.board.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until the controller is Idle or Completed.
    pub async fn settled(&self) -> PlaybackState {
        let mut rx = self.subscribe_state();
        let result = rx.wait_for(PlaybackState::is_settled).await.map(|s| *s);
        // The sender lives as long as `self`.
        result.unwrap_or_else(|_| self.state())
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.shared.epoch.invalidate();
    }
}

impl fmt::Debug for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback").field("status", &self.status()).finish()
    }
}
