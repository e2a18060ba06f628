//! Error types for corrtrack.
//!
//! All errors in corrtrack are strongly typed using thiserror.
//! Construction-time problems surface as [`ValidationError`], problems with
//! an individual call on a live tracker surface as [`AccessError`].

use thiserror::Error;

use crate::descriptor::DescriptorKind;
use crate::direction::Direction;
use crate::phase::Phase;

/// Validation errors raised while building grids, registries and trackers.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Descriptor {kind}({phase}) is requested more than once")]
    DuplicateDescriptor {
        kind: DescriptorKind,
        phase: Phase,
    },

    #[error("Phase {phase} is not declared for this grid")]
    UndeclaredPhase {
        phase: Phase,
    },

    #[error("Phase set cannot be empty")]
    EmptyPhaseSet,

    #[error("Grid must have at least one axis")]
    EmptyExtents,

    #[error("Axis {axis} has zero extent")]
    ZeroExtent {
        axis: usize,
    },

    #[error("Grid data has {actual} elements, extents require {expected}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("At least one descriptor must be tracked")]
    NoDescriptors,

    #[error("At least one direction must be tracked")]
    NoDirections,

    #[error("Direction {direction} is listed more than once")]
    DuplicateDirection {
        direction: Direction,
    },

    #[error("Direction {direction} needs {required} axes, grid has {ndim}")]
    DirectionOutOfRank {
        direction: Direction,
        required: usize,
        ndim: usize,
    },

    #[error("Tracked length must be at least 1")]
    TrackedLengthZero,

    #[error("Invalid tracker configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Errors raised by reads and writes on a constructed tracker.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Coordinate {coord:?} is outside grid extents {extents:?}")]
    OutOfBounds {
        coord: Vec<usize>,
        extents: Vec<usize>,
    },

    #[error("Phase {phase} is not one of the declared phases")]
    InvalidPhase {
        phase: Phase,
    },

    #[error("Descriptor {kind}({phase}) is not tracked")]
    UnsupportedDescriptorKind {
        kind: DescriptorKind,
        phase: Phase,
    },

    #[error("Direction {direction} is not tracked")]
    UntrackedDirection {
        direction: Direction,
    },

    #[error("Rollback token rejected: {reason}")]
    InvalidToken {
        reason: String,
    },
}

/// Top-level error type for corrtrack.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TrackerError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an access error.
    #[must_use]
    pub const fn is_access(&self) -> bool {
        matches!(self, Self::Access(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if a rollback token was rejected.
    #[must_use]
    pub const fn is_invalid_token(&self) -> bool {
        matches!(self, Self::Access(AccessError::InvalidToken { .. }))
    }
}

/// Result type alias for corrtrack operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
