//! Injected collaborator interfaces.
//!
//! The aggregate never reaches for ambient services: measurement, storage,
//! default-value catalogs, and debounce timing all arrive as constructor
//! parameters, so the core compiles and tests against deterministic fakes.

use crate::geometry::NodeBox;
use crate::tree::{NodeId, TreeId, TreeTemplate};
use crossbeam_channel::{RecvTimeoutError, bounded};
use std::thread;
use std::time::Duration;

/// Synchronous view-measurement query.
///
/// Absence means "not yet laid out" and is always survivable: geometry that
/// depends on a missing box is skipped until a later rebuild.
pub trait MeasurePort {
    fn measure(&self, id: NodeId) -> Option<NodeBox>;
}

/// Measure port with no boxes; every geometry computation skips.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unmeasured;

impl MeasurePort for Unmeasured {
    fn measure(&self, _id: NodeId) -> Option<NodeBox> {
        None
    }
}

/// Backing store for named trees.
///
/// `persist` is fire-and-forget and is called at most once per debounce
/// window; `load` runs once at aggregate construction.
pub trait TemplateStore: Send + Sync {
    fn load(&self, id: TreeId) -> Option<TreeTemplate>;
    fn persist(&self, template: &TreeTemplate);
}

/// Ordered default-value catalogs consumed when creating nodes; the first
/// entry of each list wins.
pub trait Catalog {
    fn decision_tests(&self) -> &[String];
    fn action_commands(&self) -> &[String];
}

/// Catalog with no registered kinds; node defaults fall back to empty
/// strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalog;

impl Catalog for EmptyCatalog {
    fn decision_tests(&self) -> &[String] {
        &[]
    }

    fn action_commands(&self) -> &[String] {
        &[]
    }
}

/// Schedules a task to run once after a delay.
pub trait TimerPort {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TimerHandle;
}

/// Owner side of a scheduled task. Cancelling the handle, or dropping it,
/// prevents the task from firing; an already-fired task is unaffected.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Thread-backed [`TimerPort`].
///
/// Each schedule parks one thread on a cancellation channel: a message or a
/// dropped handle cancels, a timeout fires the task on the timer thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

impl TimerPort for ThreadTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TimerHandle {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(delay) {
                task();
            }
        });

        TimerHandle::new(move || {
            let _ = cancel_tx.send(());
        })
    }
}
