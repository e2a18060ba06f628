//! A one-dimensional view of the grid through a point along a direction.

use std::cell::Cell;

use crate::descriptor::DescriptorKind;
use crate::grid::Grid;
use crate::phase::Phase;

/// Whether a read sees the pending write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Before,
    After,
}

/// The lattice line `origin + k·step`.
///
/// Offsets outside the grid resolve to `None` in non-periodic mode and wrap
/// per axis in periodic mode. An optional patch overrides one element for
/// [`View::After`] reads, which lets the engine evaluate the grid as it will
/// be without writing to it.
pub(crate) struct Line<'a> {
    grid: &'a Grid,
    origin: &'a [usize],
    step: &'a [isize],
    periodic: bool,
    patch: Option<(usize, Phase)>,
    reads: Cell<usize>,
}

impl<'a> Line<'a> {
    pub(crate) fn new(grid: &'a Grid, origin: &'a [usize], step: &'a [isize], periodic: bool) -> Self {
        Self {
            grid,
            origin,
            step,
            periodic,
            patch: None,
            reads: Cell::new(0),
        }
    }

    pub(crate) fn with_patch(mut self, index: usize, phase: Phase) -> Self {
        self.patch = Some((index, phase));
        self
    }

    /// Row-major index of offset `k`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub(crate) fn index(&self, k: isize) -> Option<usize> {
        let extents = self.grid.extents();
        let strides = self.grid.strides();
        let mut index = 0usize;
        for axis in 0..extents.len() {
            let extent = extents[axis] as isize;
            let mut pos = self.origin[axis] as isize + k * self.step[axis];
            if self.periodic {
                pos = pos.rem_euclid(extent);
            } else if pos < 0 || pos >= extent {
                return None;
            }
            index += pos as usize * strides[axis];
        }
        Some(index)
    }

    pub(crate) fn phase(&self, k: isize, view: View) -> Option<Phase> {
        let index = self.index(k)?;
        self.reads.set(self.reads.get() + 1);
        if view == View::After {
            if let Some((patched, phase)) = self.patch {
                if patched == index {
                    return Some(phase);
                }
            }
        }
        Some(self.grid.phase_at(index))
    }

    /// Grid cells read so far.
    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

/// Per-point predicate a pair statistic multiplies at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indicator {
    /// The point has the phase.
    Phase,
    /// The point has the phase and a neighbour along the line does not.
    Surface,
    /// The point does not have the phase.
    Void,
}

impl Indicator {
    /// Offsets, relative to a point, whose label the indicator reads.
    pub(crate) const fn support(self) -> &'static [isize] {
        match self {
            Self::Phase | Self::Void => &[0],
            Self::Surface => &[-1, 0, 1],
        }
    }

    pub(crate) fn holds(self, line: &Line<'_>, k: isize, phase: Phase, view: View) -> bool {
        match self {
            Self::Phase => line.phase(k, view) == Some(phase),
            Self::Void => line.phase(k, view).is_some_and(|p| p != phase),
            Self::Surface => {
                line.phase(k, view) == Some(phase)
                    && [k - 1, k + 1]
                        .into_iter()
                        .any(|n| line.phase(n, view).is_some_and(|p| p != phase))
            }
        }
    }
}

/// Indicators at the two ends of a pair, or `None` for the run-based kind.
pub(crate) const fn pair_indicators(kind: DescriptorKind) -> Option<(Indicator, Indicator)> {
    match kind {
        DescriptorKind::TwoPoint => Some((Indicator::Phase, Indicator::Phase)),
        DescriptorKind::SurfaceSurface => Some((Indicator::Surface, Indicator::Surface)),
        DescriptorKind::SurfaceVoid => Some((Indicator::Surface, Indicator::Void)),
        DescriptorKind::LinealPath => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseSet;

    fn grid() -> Grid {
        Grid::from_labels(vec![3, 4], [0, 1, 1, 0, 1, 1, 0, 0, 0, 0, 1, 1], PhaseSet::binary()).unwrap()
    }

    #[test]
    fn index_clips_or_wraps() {
        let g = grid();
        let origin = [1, 3];
        let step = [1, -1];
        let clipped = Line::new(&g, &origin, &step, false);
        assert_eq!(clipped.index(0), Some(7));
        assert_eq!(clipped.index(1), Some(10));
        assert_eq!(clipped.index(2), None);
        assert_eq!(clipped.index(-1), None);

        let wrapped = Line::new(&g, &origin, &step, true);
        assert_eq!(wrapped.index(2), Some(1));
        assert_eq!(wrapped.index(-1), Some(0));
    }

    #[test]
    fn patch_is_visible_only_after() {
        let g = grid();
        let origin = [0, 0];
        let step = [0, 1];
        let line = Line::new(&g, &origin, &step, false).with_patch(1, Phase(0));
        assert_eq!(line.phase(1, View::Before), Some(Phase(1)));
        assert_eq!(line.phase(1, View::After), Some(Phase(0)));
        assert_eq!(line.phase(4, View::After), None);
        assert_eq!(line.reads(), 2);
    }

    #[test]
    fn surface_needs_a_different_neighbour() {
        let g = grid();
        let origin = [0, 0];
        let step = [0, 1];
        let line = Line::new(&g, &origin, &step, false);
        // Row 0 is 0 1 1 0.
        assert!(Indicator::Surface.holds(&line, 1, Phase(1), View::Before));
        assert!(Indicator::Surface.holds(&line, 2, Phase(1), View::Before));
        assert!(!Indicator::Surface.holds(&line, 0, Phase(1), View::Before));
        assert!(Indicator::Surface.holds(&line, 0, Phase(0), View::Before));
        assert!(Indicator::Void.holds(&line, 3, Phase(1), View::Before));
        assert!(!Indicator::Void.holds(&line, 4, Phase(1), View::Before));
    }
}
