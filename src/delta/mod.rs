//! Delta engine.
//!
//! Given a pending single-element write, computes the signed change to every
//! lag of every tracked `(direction, descriptor)` buffer. Only the line
//! through the written element along each direction is read, out to the
//! tracked length, so the cost does not depend on the grid size.

mod line;
mod pairs;
mod runs;

pub(crate) use line::{pair_indicators, Line, View};

use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorRegistry;
use crate::direction::Direction;
use crate::grid::Grid;
use crate::phase::Phase;

/// One non-zero change to one buffer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeltaEntry {
    /// Position of the direction in the tracker's direction list.
    pub direction: usize,
    /// Position of the descriptor in the registry.
    pub descriptor: usize,
    /// Lag the change applies to.
    pub lag: usize,
    /// Signed change to the success count.
    pub change: i64,
}

/// The full set of buffer changes caused by one write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaSet {
    entries: Vec<DeltaEntry>,
    cells_read: usize,
}

impl DeltaSet {
    /// Non-zero changes in direction, descriptor, lag order.
    #[must_use]
    pub fn entries(&self) -> &[DeltaEntry] {
        &self.entries
    }

    /// Number of non-zero changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the write changes no buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grid cells read while computing the delta.
    #[must_use]
    pub const fn cells_read(&self) -> usize {
        self.cells_read
    }

    pub(crate) fn record(&mut self, direction: usize, descriptor: usize, lag: usize, change: i64) {
        if change != 0 {
            self.entries.push(DeltaEntry {
                direction,
                descriptor,
                lag,
                change,
            });
        }
    }
}

/// Buffer a delta is recorded against.
#[derive(Debug, Clone, Copy)]
struct Slot {
    direction: usize,
    descriptor: usize,
}

/// Borrowed view of a tracker's state used to compute deltas.
pub(crate) struct DeltaEngine<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) registry: &'a DescriptorRegistry,
    pub(crate) directions: &'a [Direction],
    pub(crate) periodic: bool,
    pub(crate) tracked_length: usize,
}

impl DeltaEngine<'_> {
    /// Delta for writing `new` at `coord` (row-major `index`).
    ///
    /// Reads the grid in its current state; the caller writes afterwards.
    pub(crate) fn compute(&self, coord: &[usize], index: usize, new: Phase) -> DeltaSet {
        let old = self.grid.phase_at(index);
        let mut delta = DeltaSet::default();
        if old == new {
            return delta;
        }

        for (d, direction) in self.directions.iter().enumerate() {
            let step = direction.step(self.grid.ndim());
            let line = Line::new(self.grid, coord, &step, self.periodic).with_patch(index, new);

            for (k, descriptor) in self.registry.iter().enumerate() {
                let phase = descriptor.phase;
                if old != phase && new != phase {
                    continue;
                }
                let slot = Slot {
                    direction: d,
                    descriptor: k,
                };
                match pair_indicators(descriptor.kind) {
                    Some((head, tail)) => {
                        pairs::pair_delta(&line, head, tail, phase, self.tracked_length, slot, &mut delta);
                    }
                    None => {
                        runs::lineal_path_delta(&line, phase, old, new, self.tracked_length, slot, &mut delta);
                    }
                }
            }

            delta.cells_read += line.reads();
        }

        delta
    }
}
