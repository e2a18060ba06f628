//! Fluent construction of trackers.

use crate::config::TrackerConfig;
use crate::descriptor::Descriptor;
use crate::direction::Direction;
use crate::error::TrackerResult;
use crate::grid::Grid;

use super::CorrelationTracker;

/// Builder for [`CorrelationTracker`].
///
/// Tracks [`Descriptor::defaults`] when no descriptor is added.
#[derive(Debug, Clone)]
pub struct TrackerBuilder {
    grid: Grid,
    descriptors: Vec<Descriptor>,
    config: TrackerConfig,
}

impl TrackerBuilder {
    /// Create a new builder over `grid`.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            descriptors: Vec::new(),
            config: TrackerConfig::default(),
        }
    }

    /// Track one more descriptor.
    #[must_use]
    pub fn track(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Track several descriptors.
    #[must_use]
    pub fn tracking(mut self, descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Wrap neighbourhoods at the grid edges.
    #[must_use]
    pub fn periodic(mut self, periodic: bool) -> Self {
        self.config.periodic = periodic;
        self
    }

    /// Directions to track.
    #[must_use]
    pub fn directions(mut self, directions: Vec<Direction>) -> Self {
        self.config.directions = Some(directions);
        self
    }

    /// Requested number of lags.
    #[must_use]
    pub fn tracked_length(mut self, len: usize) -> Self {
        self.config.tracked_length = Some(len);
        self
    }

    /// Overlay entries allowed before shared grid storage is copied.
    #[must_use]
    pub fn overlay_limit(mut self, limit: usize) -> Self {
        self.config.overlay_limit = limit;
        self
    }

    /// Build the tracker.
    pub fn build(self) -> TrackerResult<CorrelationTracker> {
        let descriptors = if self.descriptors.is_empty() {
            Descriptor::defaults()
        } else {
            self.descriptors
        };
        CorrelationTracker::new(self.grid, descriptors, &self.config)
    }
}
