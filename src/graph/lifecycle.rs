//! Staged-write interception and debounced persistence.
//!
//! Mutations run through [`Graph::apply`]; the error report is the only
//! field written outside that path, through [`Graph::set_errors`]. Keeping
//! the two tiers as separate methods makes the "validation never re-runs on
//! its own write" rule structural rather than a runtime check.

use super::{ErrorReport, Graph};
use crate::validate;
use std::sync::Arc;

impl Graph {
    /// High tier: stages an edit, then commits it.
    pub(super) fn apply<R>(&mut self, edit: impl FnOnce(&mut Self) -> R) -> R {
        let out = edit(self);
        self.commit();
        out
    }

    /// Low tier: plain field write used by validation itself; bypasses the
    /// validating commit path.
    pub(super) fn set_errors(&mut self, errors: ErrorReport) {
        self.errors = errors;
    }

    /// Re-runs cycle detection against the current node list.
    pub(super) fn refresh_errors(&mut self) {
        let loops = validate::find_loops(&self.nodes);
        self.set_errors(ErrorReport { loops });
    }

    /// Validates the staged state and re-arms the persist debounce.
    ///
    /// Every mutating operation ends here; [`replace`](Graph::replace)
    /// leaves the call to the caller.
    pub fn commit(&mut self) {
        self.refresh_errors();
        self.arm_persist();
    }

    /// Schedules persistence after the quiet period. Re-arming drops the
    /// previous handle, which cancels its task, so a burst of commits
    /// collapses into one persist call carrying the final state.
    fn arm_persist(&mut self) {
        let snapshot = self.template();
        let store = Arc::clone(&self.store);
        let task = Box::new(move || store.persist(&snapshot));

        self.pending_persist = Some(self.timer.schedule(self.quiet_period, task));
        log::trace!("persist armed for tree {}", self.id);
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        // a pending timer must not fire against a torn-down aggregate
        if let Some(handle) = self.pending_persist.take() {
            handle.cancel();
        }
    }
}
