//! Deltas for the lineal-path function.
//!
//! A lag-`r` segment through the line origin covers `r + 1` cells with the
//! origin at some position `j`. With `behind` matching cells directly before
//! the origin and `ahead` directly after it, the segment lies inside the run
//! exactly when `j <= behind` and `r - j <= ahead`.

use crate::phase::Phase;

use super::line::{Line, View};
use super::{DeltaSet, Slot};

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(super) fn lineal_path_delta(
    line: &Line<'_>,
    phase: Phase,
    old: Phase,
    new: Phase,
    len: usize,
    slot: Slot,
    out: &mut DeltaSet,
) {
    let sign: i64 = if new == phase {
        1
    } else if old == phase {
        -1
    } else {
        return;
    };

    let max_lag = len.saturating_sub(1);
    let behind = run_length(line, -1, phase, max_lag);
    let ahead = run_length(line, 1, phase, max_lag);

    for lag in 0..len {
        let lo = lag.saturating_sub(ahead);
        let hi = lag.min(behind);
        if hi >= lo {
            out.record(slot.direction, slot.descriptor, lag, sign * (hi - lo + 1) as i64);
        }
    }
}

/// Consecutive cells of `phase` next to the origin, walking `towards`.
#[allow(clippy::cast_possible_wrap)]
fn run_length(line: &Line<'_>, towards: isize, phase: Phase, cap: usize) -> usize {
    let mut n = 0usize;
    while n < cap && line.phase(towards * (n as isize + 1), View::Before) == Some(phase) {
        n += 1;
    }
    n
}
