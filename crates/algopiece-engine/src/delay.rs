//! The delay primitive: the only place a runner suspends.

use std::time::Duration;

use crate::token::RunToken;

/// Marker returned when a run's token has been superseded. Not an error: the
/// controller simply stops driving the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Halted;

/// Sleep for `duration` unless the run is superseded first.
///
/// Reset and restart cancel an in-flight delay by advancing the epoch, which
/// wakes [`RunToken::superseded`].
pub(crate) async fn delay(duration: Duration, token: &mut RunToken) -> Result<(), Halted> {
    if !token.is_current() {
        return Err(Halted);
    }
    if duration.is_zero() {
        tokio::task::yield_now().await;
        return if token.is_current() { Ok(()) } else { Err(Halted) };
    }
    tokio::select! {
        biased;
        _ = token.superseded() => Err(Halted),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
