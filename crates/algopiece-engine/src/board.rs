//! The view a renderer should be showing right now.

use std::sync::{Mutex, PoisonError};

use crate::snapshot::View;

/// Latest published view, or the idle view after a reset or a model change.
///
/// The pacer writes it while the run is pinned as current, so a superseded
/// runner can never overwrite a cleared board.
#[derive(Debug)]
pub(crate) struct Board {
    view: Mutex<View>,
}

impl Board {
    pub(crate) fn new(view: View) -> Self {
        Self {
            view: Mutex::new(view),
        }
    }

    pub(crate) fn show(&self, view: View) {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view;
    }

    pub(crate) fn current(&self) -> View {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(View::Array(Default::default()))
    }
}
