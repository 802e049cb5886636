//! Run tokens.
//!
//! The [`Epoch`] holds the id of the one authoritative run. Minting a token
//! supersedes whatever run was current; invalidating leaves no run current.
//! Every externally visible effect of a runner goes through
//! [`RunToken::while_current`], which holds the epoch lock for the duration of
//! the effect, so an effect can never land after the epoch has moved on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Identifier of one run. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Id 0 is never minted; it marks "no current run".
const NO_RUN: u64 = 0;

pub(crate) struct Epoch {
    current: Mutex<u64>,
    wake: watch::Sender<u64>,
    minted: AtomicU64,
}

impl Epoch {
    pub(crate) fn new() -> Arc<Self> {
        let (wake, _) = watch::channel(NO_RUN);
        Arc::new(Self {
            current: Mutex::new(NO_RUN),
            wake,
            minted: AtomicU64::new(NO_RUN),
        })
    }

    /// Start a new run, superseding the current one.
    pub(crate) fn mint(self: &Arc<Self>) -> RunToken {
        let mut current = self.lock();
        let id = self.minted.fetch_add(1, Ordering::Relaxed) + 1;
        *current = id;
        self.wake.send_replace(id);
        RunToken {
            id: RunId(id),
            epoch: Arc::clone(self),
            wake: self.wake.subscribe(),
        }
    }

    /// Supersede the current run without starting another.
    pub(crate) fn invalidate(&self) {
        let mut current = self.lock();
        *current = NO_RUN;
        self.wake.send_replace(NO_RUN);
    }

    pub(crate) fn current(&self) -> Option<RunId> {
        let current = *self.lock();
        (current != NO_RUN).then_some(RunId(current))
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle a runner holds for the lifetime of its run.
pub(crate) struct RunToken {
    id: RunId,
    epoch: Arc<Epoch>,
    wake: watch::Receiver<u64>,
}

impl RunToken {
    pub(crate) fn id(&self) -> RunId {
        self.id
    }

    pub(crate) fn is_current(&self) -> bool {
        *self.epoch.lock() == self.id.0
    }

    /// Run `f` if this token is still current. The epoch cannot advance while
    /// `f` executes.
    pub(crate) fn while_current<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let current = self.epoch.lock();
        if *current == self.id.0 {
            Some(f())
        } else {
            None
        }
    }

    /// Resolves once this token has been superseded.
    pub(crate) async fn superseded(&mut self) {
        loop {
            if !self.is_current() {
                return;
            }
            if self.wake.changed().await.is_err() {
                // The epoch owns the sender and we own the epoch.
                std::future::pending::<()>().await;
            }
        }
    }
}
