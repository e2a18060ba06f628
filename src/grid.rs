//! Grid store.
//!
//! Owns the element labels of an N-dimensional multi-phase array and exposes
//! bounds-checked single-element access.
//!
//! Key invariants:
//! - Every stored label belongs to the declared [`PhaseSet`].
//! - Storage is shared between clones; a clone that writes while the storage is
//!   shared records the write in a private overlay (merge-on-read) and folds it
//!   into a private copy once the overlay grows past its limit.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{AccessError, ValidationError};
use crate::phase::{Phase, PhaseSet};

/// Default number of overlay entries a shared grid holds before copying.
pub const DEFAULT_OVERLAY_LIMIT: usize = 4096;

/// An N-dimensional array of phase labels in row-major order.
#[derive(Clone)]
pub struct Grid {
    extents: Arc<[usize]>,
    strides: Arc<[usize]>,
    phases: PhaseSet,
    base: Arc<Vec<Phase>>,
    overlay: HashMap<usize, Phase>,
    overlay_limit: usize,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("extents", &self.extents)
            .field("phases", &self.phases)
            .field("overlay", &self.overlay.len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.extents == other.extents
            && self.phases == other.phases
            && self.iter().eq(other.iter())
    }
}

impl Eq for Grid {}

fn element_count(extents: &[usize]) -> Result<usize, ValidationError> {
    if extents.is_empty() {
        return Err(ValidationError::EmptyExtents);
    }
    let mut count = 1usize;
    for (axis, &extent) in extents.iter().enumerate() {
        if extent == 0 {
            return Err(ValidationError::ZeroExtent { axis });
        }
        count = count.checked_mul(extent).ok_or_else(|| ValidationError::InvalidConfig {
            reason: format!("grid extents {extents:?} overflow usize"),
        })?;
    }
    Ok(count)
}

fn row_major_strides(extents: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; extents.len()];
    for axis in (0..extents.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * extents[axis + 1];
    }
    strides
}

impl Grid {
    /// Creates a grid from row-major data.
    pub fn new(extents: Vec<usize>, data: Vec<Phase>, phases: PhaseSet) -> Result<Self, ValidationError> {
        let expected = element_count(&extents)?;
        if data.len() != expected {
            return Err(ValidationError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        if let Some(&phase) = data.iter().find(|&&p| !phases.contains(p)) {
            return Err(ValidationError::UndeclaredPhase { phase });
        }
        let strides = row_major_strides(&extents);
        Ok(Self {
            extents: extents.into(),
            strides: strides.into(),
            phases,
            base: Arc::new(data),
            overlay: HashMap::new(),
            overlay_limit: DEFAULT_OVERLAY_LIMIT,
        })
    }

    /// Creates a grid from raw row-major labels.
    pub fn from_labels<I>(extents: Vec<usize>, labels: I, phases: PhaseSet) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = u8>,
    {
        Self::new(extents, labels.into_iter().map(Phase).collect(), phases)
    }

    /// Creates a grid by evaluating `f` at every coordinate.
    pub fn from_fn<F>(extents: Vec<usize>, phases: PhaseSet, mut f: F) -> Result<Self, ValidationError>
    where
        F: FnMut(&[usize]) -> Phase,
    {
        let count = element_count(&extents)?;
        let strides = row_major_strides(&extents);
        let mut coord = vec![0usize; extents.len()];
        let mut data = Vec::with_capacity(count);
        for index in 0..count {
            unravel(&extents, &strides, index, &mut coord);
            data.push(f(&coord));
        }
        Self::new(extents, data, phases)
    }

    /// Creates a grid with every element set to `phase`.
    pub fn filled(extents: Vec<usize>, phase: Phase, phases: PhaseSet) -> Result<Self, ValidationError> {
        let count = element_count(&extents)?;
        Self::new(extents, vec![phase; count], phases)
    }

    /// Number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Size of every axis.
    #[must_use]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    pub(crate) fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Always false; a grid has at least one element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Declared phase labels.
    #[must_use]
    pub const fn phases(&self) -> PhaseSet {
        self.phases
    }

    /// Smallest axis extent.
    #[must_use]
    pub fn min_extent(&self) -> usize {
        self.extents.iter().copied().min().unwrap_or(0)
    }

    /// Maps a coordinate to its row-major index.
    pub fn checked_index(&self, coord: &[usize]) -> Result<usize, AccessError> {
        if coord.len() != self.extents.len()
            || coord.iter().zip(self.extents.iter()).any(|(&c, &e)| c >= e)
        {
            return Err(AccessError::OutOfBounds {
                coord: coord.to_vec(),
                extents: self.extents.to_vec(),
            });
        }
        Ok(coord.iter().zip(self.strides.iter()).map(|(&c, &s)| c * s).sum())
    }

    /// Writes the coordinate of row-major `index` into `coord`.
    pub fn unravel_into(&self, index: usize, coord: &mut [usize]) {
        unravel(&self.extents, &self.strides, index, coord);
    }

    /// Rejects labels outside the declared set.
    pub fn check_phase(&self, phase: Phase) -> Result<(), AccessError> {
        if self.phases.contains(phase) {
            Ok(())
        } else {
            Err(AccessError::InvalidPhase { phase })
        }
    }

    /// Reads one element.
    pub fn get(&self, coord: &[usize]) -> Result<Phase, AccessError> {
        let index = self.checked_index(coord)?;
        Ok(self.phase_at(index))
    }

    /// Writes one element and returns its previous label.
    pub fn set(&mut self, coord: &[usize], phase: Phase) -> Result<Phase, AccessError> {
        let index = self.checked_index(coord)?;
        self.check_phase(phase)?;
        Ok(self.write_at(index, phase))
    }

    pub(crate) fn phase_at(&self, index: usize) -> Phase {
        if !self.overlay.is_empty() {
            if let Some(&phase) = self.overlay.get(&index) {
                return phase;
            }
        }
        self.base[index]
    }

    pub(crate) fn write_at(&mut self, index: usize, phase: Phase) -> Phase {
        let old = self.phase_at(index);
        if let Some(base) = Arc::get_mut(&mut self.base) {
            for (i, p) in self.overlay.drain() {
                base[i] = p;
            }
            base[index] = phase;
            return old;
        }
        self.overlay.insert(index, phase);
        if self.overlay.len() > self.overlay_limit {
            self.compact();
        }
        old
    }

    /// Folds the overlay into private storage.
    pub fn compact(&mut self) {
        if self.overlay.is_empty() {
            return;
        }
        debug!(entries = self.overlay.len(), elements = self.base.len(), "compacting grid overlay");
        let base = Arc::make_mut(&mut self.base);
        for (i, p) in self.overlay.drain() {
            base[i] = p;
        }
    }

    pub(crate) fn set_overlay_limit(&mut self, limit: usize) {
        self.overlay_limit = limit;
    }

    /// Number of writes held in the overlay.
    #[must_use]
    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }

    /// Returns true if both grids read from the same underlying storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.base, &other.base)
    }

    /// Iterates every element in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Phase> + '_ {
        (0..self.base.len()).map(move |i| self.phase_at(i))
    }

    /// Copies every element into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Phase> {
        self.iter().collect()
    }
}

fn unravel(extents: &[usize], strides: &[usize], mut index: usize, coord: &mut [usize]) {
    for ((c, &stride), &extent) in coord.iter_mut().zip(strides).zip(extents) {
        *c = (index / stride) % extent;
        index %= stride;
    }
}
