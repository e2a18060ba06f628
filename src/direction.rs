//! Lattice directions along which correlations are evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lattice axis or planar diagonal.
///
/// Axis `X` is grid axis 0, `Y` is axis 1 and `Z` is axis 2. Diagonals step
/// by one along both named axes; the reversed name (`YX`, `ZX`, `ZY`) is the
/// anti-diagonal of the same plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Along axis 0.
    X,
    /// Along axis 1.
    Y,
    /// Along axis 2.
    Z,
    /// Diagonal `(+1, +1)` in the axis 0/1 plane.
    XY,
    /// Anti-diagonal `(+1, -1)` in the axis 0/1 plane.
    YX,
    /// Diagonal `(+1, +1)` in the axis 0/2 plane.
    XZ,
    /// Anti-diagonal `(+1, -1)` in the axis 0/2 plane.
    ZX,
    /// Diagonal `(+1, +1)` in the axis 1/2 plane.
    YZ,
    /// Anti-diagonal `(+1, -1)` in the axis 1/2 plane.
    ZY,
}

impl Direction {
    /// Every supported direction.
    pub const ALL: [Self; 9] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::XY,
        Self::YX,
        Self::XZ,
        Self::ZX,
        Self::YZ,
        Self::ZY,
    ];

    /// Orthogonal axes available on a grid of rank `ndim`.
    #[must_use]
    pub fn axes(ndim: usize) -> Vec<Self> {
        [Self::X, Self::Y, Self::Z]
            .into_iter()
            .take(ndim)
            .collect()
    }

    /// Minimum grid rank this direction needs.
    #[must_use]
    pub const fn required_rank(self) -> usize {
        match self {
            Self::X => 1,
            Self::Y | Self::XY | Self::YX => 2,
            Self::Z | Self::XZ | Self::ZX | Self::YZ | Self::ZY => 3,
        }
    }

    /// Returns true for the orthogonal axes.
    #[must_use]
    pub const fn is_axis(self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }

    const fn components(self) -> [isize; 3] {
        match self {
            Self::X => [1, 0, 0],
            Self::Y => [0, 1, 0],
            Self::Z => [0, 0, 1],
            Self::XY => [1, 1, 0],
            Self::YX => [1, -1, 0],
            Self::XZ => [1, 0, 1],
            Self::ZX => [1, 0, -1],
            Self::YZ => [0, 1, 1],
            Self::ZY => [0, 1, -1],
        }
    }

    /// Unit lattice step on a grid of rank `ndim`.
    ///
    /// Axes beyond the third never move.
    #[must_use]
    pub fn step(self, ndim: usize) -> Vec<isize> {
        let c = self.components();
        (0..ndim).map(|axis| c.get(axis).copied().unwrap_or(0)).collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::XY => "xy",
            Self::YX => "yx",
            Self::XZ => "xz",
            Self::ZX => "zx",
            Self::YZ => "yz",
            Self::ZY => "zy",
        };
        f.write_str(name)
    }
}
