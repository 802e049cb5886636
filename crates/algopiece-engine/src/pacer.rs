//! Per-run step context handed to the runners.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use algopiece_model::AlgorithmId;
use tracing::trace;

use crate::board::Board;
use crate::config::{Beat, DelayProfile};
use crate::controls::Controls;
use crate::delay::{delay, Halted};
use crate::observer::Observer;
use crate::snapshot::{Snapshot, View};
use crate::token::{RunId, RunToken};

/// Everything a runner needs to publish a step: the pause gate, the run
/// token, the observer, the board and the speed knob.
///
/// A step is: wait at the gate, publish the snapshot if the run is still
/// current, then sleep for the speed-derived delay.
pub(crate) struct Pacer {
    token: RunToken,
    algorithm: AlgorithmId,
    controls: Arc<Controls>,
    observer: Arc<dyn Observer>,
    board: Arc<Board>,
    profile: DelayProfile,
    step: u64,
}

impl Pacer {
    pub(crate) fn new(
        token: RunToken,
        algorithm: AlgorithmId,
        controls: Arc<Controls>,
        observer: Arc<dyn Observer>,
        board: Arc<Board>,
        profile: DelayProfile,
    ) -> Self {
        Self {
            token,
            algorithm,
            controls,
            observer,
            board,
            profile,
            step: 0,
        }
    }

    pub(crate) fn run_id(&self) -> RunId {
        self.token.id()
    }

    #[cfg(test)]
    pub(crate) fn token(&self) -> &RunToken {
        &self.token
    }

    pub(crate) async fn step(
        &mut self,
        view: View,
        description: impl Into<String>,
        beat: Beat,
    ) -> Result<(), Halted> {
        self.controls.gate.pass(&mut self.token).await?;

        let snapshot = Snapshot {
            run: self.token.id(),
            step: self.step,
            algorithm: self.algorithm,
            view,
            description: description.into(),
        };
        let controls = &self.controls;
        let observer = &self.observer;
        let board = &self.board;
        self.token
            .while_current(|| {
                controls.emitted.fetch_add(1, Ordering::SeqCst);
                board.show(snapshot.view.clone());
                observer.on_snapshot(&snapshot);
            })
            .ok_or(Halted)?;
        trace!(run = %snapshot.run, step = snapshot.step, "{}", snapshot.description);
        self.step += 1;

        let pause = self.profile.duration(self.controls.speed.get(), beat);
        delay(pause, &mut self.token).await
    }
}
