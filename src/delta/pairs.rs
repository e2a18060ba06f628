//! Deltas for pair statistics (S2, surface-surface, surface-void).
//!
//! A pair statistic is `F(r) = Σ head(x)·tail(x + r·d)`. A write at the line
//! origin only changes `head` at offsets in `head.support()` and `tail` at
//! offsets in `tail.support()`, so only pairs starting at those offsets, or
//! ending at them, can change. Each such pair is evaluated before and after
//! the write.

use crate::phase::Phase;

use super::line::{Indicator, Line, View};
use super::{DeltaSet, Slot};

#[allow(clippy::cast_possible_wrap)]
pub(super) fn pair_delta(
    line: &Line<'_>,
    head: Indicator,
    tail: Indicator,
    phase: Phase,
    len: usize,
    slot: Slot,
    out: &mut DeltaSet,
) {
    // Starting points already evaluated for the current lag. Periodic lines
    // can reach one point through two offsets.
    let mut seen: Vec<usize> = Vec::with_capacity(head.support().len() + tail.support().len());

    for lag in 0..len {
        let r = lag as isize;
        seen.clear();
        let mut change = 0i64;

        let starts = head
            .support()
            .iter()
            .copied()
            .chain(tail.support().iter().map(|&k| k - r));
        for k in starts {
            let (Some(start), Some(_)) = (line.index(k), line.index(k + r)) else {
                continue;
            };
            if seen.contains(&start) {
                continue;
            }
            seen.push(start);

            let before = head.holds(line, k, phase, View::Before) && tail.holds(line, k + r, phase, View::Before);
            let after = head.holds(line, k, phase, View::After) && tail.holds(line, k + r, phase, View::After);
            change += i64::from(after) - i64::from(before);
        }

        out.record(slot.direction, slot.descriptor, lag, change);
    }
}
