//! The boundary snapshots cross on their way to a renderer.

use std::sync::{Arc, Mutex, PoisonError};

use crate::snapshot::{Snapshot, View};

/// Receives every snapshot of the current run, in emission order.
///
/// Called synchronously from the runner while the run is pinned as current.
/// Implementations must not call back into the [`Playback`](crate::Playback)
/// that owns them; forward to a channel instead.
pub trait Observer: Send + Sync + 'static {
    fn on_snapshot(&self, snapshot: &Snapshot);

    /// The board was cleared by a reset or a model change; `view` is the idle
    /// view of the model as it now stands. Arrives after the last snapshot of
    /// the abandoned run.
    fn on_cleared(&self, _view: &View) {}
}

impl<F> Observer for F
where
    F: Fn(&Snapshot) + Send + Sync + 'static,
{
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// One notification, as a [`Recorder`] saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    Snapshot(Snapshot),
    Cleared(View),
}

/// Keeps every notification in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<Observed>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots only, in emission order.
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Observed::Snapshot(snapshot) => Some(snapshot.clone()),
                Observed::Cleared(_) => None,
            })
            .collect()
    }

    /// Idle views handed over by resets and model changes.
    pub fn cleared(&self) -> Vec<View> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Observed::Cleared(view) => Some(view.clone()),
                Observed::Snapshot(_) => None,
            })
            .collect()
    }

    pub fn log(&self) -> Vec<Observed> {
        self.lock().clone()
    }

    /// Number of snapshots received.
    pub fn len(&self) -> usize {
        self.lock()
            .iter()
            .filter(|event| matches!(event, Observed::Snapshot(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<Snapshot> {
        self.lock().iter().rev().find_map(|event| match event {
            Observed::Snapshot(snapshot) => Some(snapshot.clone()),
            Observed::Cleared(_) => None,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Observed>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for Recorder {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.lock().push(Observed::Snapshot(snapshot.clone()));
    }

    fn on_cleared(&self, view: &View) {
        self.lock().push(Observed::Cleared(view.clone()));
    }
}
