//! Correlation buffers laid out as direction × descriptor × lag.

use crate::delta::DeltaSet;
use crate::descriptor::DescriptorRegistry;
use crate::direction::Direction;
use crate::grid::Grid;

use super::{placement_totals, reference, CorrelationData};

/// Which way a delta set is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Apply {
    Forward,
    Reverse,
}

/// Cached correlation counts for every tracked `(direction, descriptor)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CorrelationBuffers {
    descriptors: usize,
    len: usize,
    counts: Vec<u64>,
    totals: Vec<Vec<u64>>,
}

impl CorrelationBuffers {
    /// Fills every buffer with one from-scratch pass over the grid.
    pub(crate) fn initialize(
        grid: &Grid,
        registry: &DescriptorRegistry,
        directions: &[Direction],
        periodic: bool,
        len: usize,
    ) -> Self {
        let mut counts = Vec::with_capacity(directions.len() * registry.len() * len);
        let mut totals = Vec::with_capacity(directions.len());
        for &direction in directions {
            for descriptor in registry.iter() {
                let data = reference::compute(grid, descriptor, direction, periodic, len);
                counts.extend_from_slice(&data.success);
            }
            totals.push(placement_totals(grid.extents(), &direction.step(grid.ndim()), periodic, len));
        }
        Self {
            descriptors: registry.len(),
            len,
            counts,
            totals,
        }
    }

    fn offset(&self, direction: usize, descriptor: usize) -> usize {
        (direction * self.descriptors + descriptor) * self.len
    }

    /// Copy of one buffer.
    ///
    /// # Panics
    ///
    /// Panics if either position is outside the layout; callers resolve
    /// positions through the registry first.
    #[must_use]
    pub(crate) fn get(&self, direction: usize, descriptor: usize) -> CorrelationData {
        let start = self.offset(direction, descriptor);
        CorrelationData {
            success: self.counts[start..start + self.len].to_vec(),
            total: self.totals[direction].clone(),
        }
    }

    pub(crate) fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub(crate) fn apply(&mut self, delta: &DeltaSet, mode: Apply) {
        for entry in delta.entries() {
            let at = self.offset(entry.direction, entry.descriptor) + entry.lag;
            let change = match mode {
                Apply::Forward => entry.change,
                Apply::Reverse => -entry.change,
            };
            let count = &mut self.counts[at];
            debug_assert!(
                count.checked_add_signed(change).is_some(),
                "count {count} cannot take change {change} at lag {}",
                entry.lag
            );
            *count = count.saturating_add_signed(change);
        }
    }
}
