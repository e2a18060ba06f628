//! In-place writes and their rollback.
//!
//! Key invariants:
//! - Validation happens before the grid or any buffer is touched.
//! - A token is accepted only by the tracker that issued it, and only while
//!   that tracker is still in the state the token's write produced. Tokens
//!   therefore roll back in LIFO order and cannot be replayed.

use std::fmt;

use tracing::{debug, trace};

use crate::correlation::Apply;
use crate::delta::DeltaSet;
use crate::error::{AccessError, TrackerResult};
use crate::phase::Phase;

use super::{CorrelationTracker, TrackerId};

/// Everything needed to undo one write.
///
/// Consumed by [`CorrelationTracker::rollback`].
pub struct RollbackToken {
    tracker: TrackerId,
    from_version: u64,
    to_version: u64,
    index: usize,
    coord: Vec<usize>,
    old: Phase,
    new: Phase,
    delta: DeltaSet,
}

impl fmt::Debug for RollbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollbackToken")
            .field("tracker", &self.tracker)
            .field("coord", &self.coord)
            .field("old", &self.old)
            .field("new", &self.new)
            .field("changes", &self.delta.len())
            .finish_non_exhaustive()
    }
}

impl RollbackToken {
    /// Coordinate that was written.
    #[must_use]
    pub fn coord(&self) -> &[usize] {
        &self.coord
    }

    /// Label before the write.
    #[must_use]
    pub const fn old_phase(&self) -> Phase {
        self.old
    }

    /// Label after the write.
    #[must_use]
    pub const fn new_phase(&self) -> Phase {
        self.new
    }

    /// Buffer changes the write applied.
    #[must_use]
    pub const fn delta(&self) -> &DeltaSet {
        &self.delta
    }

    /// Returns true if the write left every buffer unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.old == self.new && self.delta.is_empty()
    }
}

impl CorrelationTracker {
    /// Writes `phase` at `coord`, updating every buffer, and returns a token
    /// that undoes the write.
    pub fn update(&mut self, coord: &[usize], phase: Phase) -> TrackerResult<RollbackToken> {
        let index = self.grid.checked_index(coord)?;
        self.grid.check_phase(phase)?;

        let delta = self.engine().compute(coord, index, phase);
        let old = self.grid.write_at(index, phase);
        self.buffers.apply(&delta, Apply::Forward);

        let from_version = self.version;
        self.issued += 1;
        self.version = self.issued;

        trace!(
            id = %self.id,
            index,
            old = %old,
            new = %phase,
            changes = delta.len(),
            cells_read = delta.cells_read(),
            "update applied"
        );

        Ok(RollbackToken {
            tracker: self.id,
            from_version,
            to_version: self.version,
            index,
            coord: coord.to_vec(),
            old,
            new: phase,
            delta,
        })
    }

    /// Writes `phase` at `coord` and returns the previous label.
    ///
    /// Same as [`update`](Self::update) with the token discarded.
    pub fn write(&mut self, coord: &[usize], phase: Phase) -> TrackerResult<Phase> {
        Ok(self.update(coord, phase)?.old)
    }

    /// Undoes the write `token` was issued for.
    ///
    /// Rejects tokens from other trackers and tokens whose write has since
    /// been followed by another write or rolled back.
    pub fn rollback(&mut self, token: RollbackToken) -> TrackerResult<()> {
        if token.tracker != self.id {
            debug!(id = %self.id, issuer = %token.tracker, "rollback token from another tracker");
            return Err(AccessError::InvalidToken {
                reason: format!("token was issued by tracker {}", token.tracker),
            }
            .into());
        }
        if token.to_version != self.version {
            debug!(
                id = %self.id,
                token_version = token.to_version,
                version = self.version,
                "stale rollback token"
            );
            return Err(AccessError::InvalidToken {
                reason: format!(
                    "token belongs to version {}, tracker is at version {}",
                    token.to_version, self.version
                ),
            }
            .into());
        }

        self.buffers.apply(&token.delta, Apply::Reverse);
        self.grid.write_at(token.index, token.old);
        self.version = token.from_version;

        trace!(id = %self.id, index = token.index, restored = %token.old, "update rolled back");
        Ok(())
    }
}
