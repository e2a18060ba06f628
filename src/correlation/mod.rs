//! Correlation values and the buffers that cache them.
//!
//! Values are kept as exact integer counts. `success[r]` is the number of
//! lag-`r` placements satisfying the descriptor, `total[r]` the number of
//! placements that fit in the grid, so `success / total` is the averaged
//! correlation function.

mod buffers;
pub mod reference;

pub(crate) use buffers::{Apply, CorrelationBuffers};

use serde::{Deserialize, Serialize};

/// Correlation function along one direction, indexed by lag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationData {
    /// Placements satisfying the descriptor, per lag.
    pub success: Vec<u64>,
    /// Placements that fit in the grid, per lag.
    pub total: Vec<u64>,
}

impl CorrelationData {
    /// Number of lags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.success.len()
    }

    /// Returns true if no lag is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.success.is_empty()
    }

    /// Normalized value at `lag`.
    #[must_use]
    pub fn value(&self, lag: usize) -> Option<f64> {
        let success = *self.success.get(lag)?;
        let total = *self.total.get(lag)?;
        #[allow(clippy::cast_precision_loss)]
        Some(success as f64 / total as f64)
    }

    /// Normalized values for every lag.
    #[must_use]
    pub fn mean(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|lag| self.value(lag)).collect()
    }
}

/// Number of lag-`r` placements along `step`, for `r` in `0..len`.
///
/// Depends only on geometry: every point in periodic mode, otherwise the
/// points whose partner `r` steps away is still inside the grid.
pub(crate) fn placement_totals(extents: &[usize], step: &[isize], periodic: bool, len: usize) -> Vec<u64> {
    let count: usize = extents.iter().product();
    (0..len)
        .map(|r| {
            let fitting = if periodic {
                count
            } else {
                extents
                    .iter()
                    .zip(step)
                    .map(|(&e, &s)| e.saturating_sub(r * s.unsigned_abs()))
                    .product()
            };
            fitting as u64
        })
        .collect()
}
