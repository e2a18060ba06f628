//! # corrtrack - Incremental directional correlation functions
//!
//! corrtrack keeps a set of directional correlation functions of a labelled
//! N-dimensional grid current while single elements of the grid are
//! rewritten. Each write costs time proportional to the tracked length and
//! the number of tracked descriptors, not to the size of the grid.
//!
//! ## Core Concepts
//!
//! - **Grid**: a dense row-major array of [`Phase`] labels with copy-on-write storage
//! - **Descriptor**: a correlation function kind (S2, L2, SS, SV) for one phase
//! - **Direction**: an axis or planar diagonal the function is measured along
//! - **Tracker**: owns the grid and one buffer per `(direction, descriptor)`,
//!   updated by exact deltas on every write
//!
//! ## Usage
//!
//! ```rust
//! use corrtrack::{CorrelationTracker, Descriptor, DescriptorKind, Direction, Grid, Phase, PhaseSet};
//!
//! let grid = Grid::from_labels(
//!     vec![4, 4],
//!     [1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 0, 0, 1, 0, 1],
//!     PhaseSet::binary(),
//! )?;
//! let mut tracker = CorrelationTracker::builder(grid)
//!     .track(Descriptor::s2(Phase(1)))
//!     .tracked_length(3)
//!     .build()?;
//!
//! let token = tracker.update(&[0, 1], Phase(1))?;
//! let s2 = tracker.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::X)?;
//! assert_eq!(s2.len(), 3);
//!
//! tracker.rollback(token)?;
//! assert!(tracker.is_consistent());
//! # Ok::<(), corrtrack::TrackerError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod config;
pub mod descriptor;
pub mod direction;
pub mod error;
pub mod grid;
pub mod phase;

// Computation
pub mod correlation;
pub mod delta;
pub mod tracker;

// Sharing across threads
pub mod sync;

pub use config::TrackerConfig;
pub use correlation::{reference, CorrelationData};
pub use delta::{DeltaEntry, DeltaSet};
pub use descriptor::{Descriptor, DescriptorKind, DescriptorRegistry};
pub use direction::Direction;
pub use error::{AccessError, TrackerError, TrackerResult, ValidationError};
pub use grid::Grid;
pub use phase::{Phase, PhaseSet};
pub use sync::SharedTracker;
pub use tracker::{CorrelationTracker, RollbackToken, StateDigest, TrackerBuilder, TrackerId};
