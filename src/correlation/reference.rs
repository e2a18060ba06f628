//! From-scratch correlation functions.
//!
//! One full pass over the grid per call. Used to fill the buffers when a
//! tracker is built and as ground truth when checking a tracker.

use crate::delta::{pair_indicators, Line, View};
use crate::descriptor::Descriptor;
use crate::direction::Direction;
use crate::grid::Grid;
use crate::phase::Phase;

use super::{placement_totals, CorrelationData};

/// Computes `descriptor` along `direction` for lags `0..len`.
///
/// Lags longer than the grid allows in non-periodic mode report zero
/// placements.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn compute(grid: &Grid, descriptor: &Descriptor, direction: Direction, periodic: bool, len: usize) -> CorrelationData {
    let step = direction.step(grid.ndim());
    let phase = descriptor.phase;
    let indicators = pair_indicators(descriptor.kind);
    let mut success = vec![0u64; len];
    let mut coord = vec![0usize; grid.ndim()];

    for index in 0..grid.len() {
        grid.unravel_into(index, &mut coord);
        let line = Line::new(grid, &coord, &step, periodic);
        match indicators {
            None => {
                let mut lag = 0usize;
                while lag < len && line.phase(lag as isize, View::Before) == Some(phase) {
                    success[lag] += 1;
                    lag += 1;
                }
            }
            Some((head, tail)) => {
                if !head.holds(&line, 0, phase, View::Before) {
                    continue;
                }
                for (lag, count) in success.iter_mut().enumerate() {
                    let lag = lag as isize;
                    if line.index(lag).is_none() {
                        break;
                    }
                    if tail.holds(&line, lag, phase, View::Before) {
                        *count += 1;
                    }
                }
            }
        }
    }

    CorrelationData {
        success,
        total: placement_totals(grid.extents(), &step, periodic, len),
    }
}

/// Two-point function of `phase`.
#[must_use]
pub fn s2(grid: &Grid, phase: Phase, direction: Direction, periodic: bool, len: usize) -> CorrelationData {
    compute(grid, &Descriptor::s2(phase), direction, periodic, len)
}

/// Lineal-path function of `phase`.
#[must_use]
pub fn l2(grid: &Grid, phase: Phase, direction: Direction, periodic: bool, len: usize) -> CorrelationData {
    compute(grid, &Descriptor::l2(phase), direction, periodic, len)
}

/// Surface-surface function of `phase`.
#[must_use]
pub fn surface_surface(grid: &Grid, phase: Phase, direction: Direction, periodic: bool, len: usize) -> CorrelationData {
    compute(grid, &Descriptor::surface_surface(phase), direction, periodic, len)
}

/// Surface-void function of `phase`.
#[must_use]
pub fn surface_void(grid: &Grid, phase: Phase, direction: Direction, periodic: bool, len: usize) -> CorrelationData {
    compute(grid, &Descriptor::surface_void(phase), direction, periodic, len)
}
