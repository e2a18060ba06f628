//! Thread-safe handle over a tracker.
//!
//! Writers (`update`, `write`, `rollback`) are serialized behind a write
//! lock. Readers and soft updates share a read lock, so a soft update always
//! starts from a state no writer is halfway through.

use std::sync::{Arc, RwLock};

use crate::correlation::CorrelationData;
use crate::descriptor::DescriptorKind;
use crate::direction::Direction;
use crate::error::{TrackerError, TrackerResult};
use crate::phase::Phase;
use crate::tracker::{CorrelationTracker, RollbackToken};

fn lock_err(context: &'static str) -> TrackerError {
    TrackerError::internal(format!("poisoned lock: {context}"))
}

/// Cloneable, shareable handle to one [`CorrelationTracker`].
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<RwLock<CorrelationTracker>>,
}

impl SharedTracker {
    /// Wraps `tracker`.
    #[must_use]
    pub fn new(tracker: CorrelationTracker) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Reads one element.
    pub fn get(&self, coord: &[usize]) -> TrackerResult<Phase> {
        let tracker = self.inner.read().map_err(|_| lock_err("tracker.get"))?;
        tracker.get(coord)
    }

    /// Copy of one correlation function.
    pub fn descriptor(&self, kind: DescriptorKind, phase: Phase, direction: Direction) -> TrackerResult<CorrelationData> {
        let tracker = self.inner.read().map_err(|_| lock_err("tracker.descriptor"))?;
        tracker.descriptor(kind, phase, direction)
    }

    /// See [`CorrelationTracker::update`].
    pub fn update(&self, coord: &[usize], phase: Phase) -> TrackerResult<RollbackToken> {
        let mut tracker = self.inner.write().map_err(|_| lock_err("tracker.update"))?;
        tracker.update(coord, phase)
    }

    /// See [`CorrelationTracker::write`].
    pub fn write(&self, coord: &[usize], phase: Phase) -> TrackerResult<Phase> {
        let mut tracker = self.inner.write().map_err(|_| lock_err("tracker.write"))?;
        tracker.write(coord, phase)
    }

    /// See [`CorrelationTracker::rollback`].
    pub fn rollback(&self, token: RollbackToken) -> TrackerResult<()> {
        let mut tracker = self.inner.write().map_err(|_| lock_err("tracker.rollback"))?;
        tracker.rollback(token)
    }

    /// Detached tracker reflecting one extra write. The shared tracker is
    /// left unchanged.
    pub fn soft_update(&self, coord: &[usize], phase: Phase) -> TrackerResult<CorrelationTracker> {
        let tracker = self.inner.read().map_err(|_| lock_err("tracker.soft_update"))?;
        tracker.soft_update(coord, phase)
    }

    /// Detached copy of the current state.
    pub fn snapshot(&self) -> TrackerResult<CorrelationTracker> {
        let tracker = self.inner.read().map_err(|_| lock_err("tracker.snapshot"))?;
        Ok(tracker.clone())
    }

    /// Runs `f` with shared access to the tracker.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&CorrelationTracker) -> R) -> TrackerResult<R> {
        let tracker = self.inner.read().map_err(|_| lock_err("tracker.with_tracker"))?;
        Ok(f(&tracker))
    }
}

impl From<CorrelationTracker> for SharedTracker {
    fn from(tracker: CorrelationTracker) -> Self {
        Self::new(tracker)
    }
}
