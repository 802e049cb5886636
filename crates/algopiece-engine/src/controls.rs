//! State shared between the controller and the active runner: the pause
//! flag, the speed knob and the emission counter.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::time::Duration;

use crate::delay::{delay, Halted};
use crate::token::RunToken;

pub const MIN_SPEED: u8 = 10;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 50;

/// Blocks a runner at step boundaries while paused.
///
/// While the flag is set the runner sleeps in `poll` sized slices. Each slice
/// is a cancellable delay, and the run token is checked before the flag, so a
/// reset releases a paused runner immediately.
#[derive(Debug)]
pub(crate) struct PauseGate {
    paused: AtomicBool,
    poll: Duration,
}

impl PauseGate {
    pub(crate) fn new(poll: Duration) -> Self {
        Self {
            paused: AtomicBool::new(false),
            poll: poll.max(Duration::from_millis(1)),
        }
    }

    pub(crate) fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub(crate) fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub(crate) async fn pass(&self, token: &mut RunToken) -> Result<(), Halted> {
        loop {
            if !token.is_current() {
                return Err(Halted);
            }
            if !self.is_paused() {
                return Ok(());
            }
            delay(self.poll, token).await?;
        }
    }
}

/// Speed percentage read by the next delay.
#[derive(Debug)]
pub(crate) struct SpeedKnob(AtomicU8);

impl SpeedKnob {
    pub(crate) fn new(percent: u8) -> Self {
        Self(AtomicU8::new(percent.clamp(MIN_SPEED, MAX_SPEED)))
    }

    pub(crate) fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns `false` and leaves the knob alone when out of range.
    pub(crate) fn set(&self, percent: u8) -> bool {
        if !(MIN_SPEED..=MAX_SPEED).contains(&percent) {
            return false;
        }
        self.0.store(percent, Ordering::Relaxed);
        true
    }
}

#[derive(Debug)]
pub(crate) struct Controls {
    pub(crate) gate: PauseGate,
    pub(crate) speed: SpeedKnob,
    /// Snapshots published by the current run.
    pub(crate) emitted: AtomicU64,
}

impl Controls {
    pub(crate) fn new(poll: Duration, speed: u8) -> Self {
        Self {
            gate: PauseGate::new(poll),
            speed: SpeedKnob::new(speed),
            emitted: AtomicU64::new(0),
        }
    }
}
