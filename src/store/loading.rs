use std::sync::{Arc, RwLock};

use super::{write_state, StoreState};

/// Holds the loading flag up for as long as it lives
///
/// Dropping the guard clears the flag, whether the action returned normally,
/// returned an error, or its future was dropped mid-flight.
#[must_use = "loading is cleared as soon as the guard is dropped"]
pub(crate) struct LoadingGuard {
    state: Arc<RwLock<StoreState>>,
}

impl LoadingGuard {
    /// Sets loading and clears any previous error in one update
    pub(crate) fn begin(state: &Arc<RwLock<StoreState>>) -> Self {
        {
            let mut guard = write_state(state);
            guard.ui.is_loading = true;
            guard.ui.error = None;
        }
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        write_state(&self.state).ui.is_loading = false;
    }
}
