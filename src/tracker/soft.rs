//! Non-mutating writes.

use std::sync::Arc;

use tracing::trace;

use crate::correlation::Apply;
use crate::error::TrackerResult;
use crate::phase::Phase;

use super::{CorrelationTracker, TrackerId};

impl CorrelationTracker {
    /// Returns a new tracker equal to this one after writing `phase` at
    /// `coord`. `self` is left untouched.
    ///
    /// The result shares grid storage with `self` and holds the write in its
    /// overlay, so the cost is one delta plus a copy of the buffers.
    pub fn soft_update(&self, coord: &[usize], phase: Phase) -> TrackerResult<Self> {
        let index = self.grid.checked_index(coord)?;
        self.grid.check_phase(phase)?;

        let delta = self.engine().compute(coord, index, phase);
        let mut buffers = self.buffers.clone();
        buffers.apply(&delta, Apply::Forward);
        let mut grid = self.grid.clone();
        grid.write_at(index, phase);

        let next = Self {
            id: TrackerId::new(),
            grid,
            registry: Arc::clone(&self.registry),
            directions: Arc::clone(&self.directions),
            periodic: self.periodic,
            tracked_length: self.tracked_length,
            buffers,
            version: 0,
            issued: 0,
        };
        trace!(source = %self.id, id = %next.id, index, changes = delta.len(), "soft update");
        Ok(next)
    }
}
