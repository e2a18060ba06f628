//! Tracker configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::ValidationError;
use crate::grid::DEFAULT_OVERLAY_LIMIT;

/// Options fixed when a tracker is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Wrap neighbourhood scans at the grid edges.
    pub periodic: bool,
    /// Requested number of lags; capped by the grid size.
    pub tracked_length: Option<usize>,
    /// Directions to track; all orthogonal axes when absent.
    pub directions: Option<Vec<Direction>>,
    /// Writes a soft-updated grid may hold over shared storage before copying it.
    pub overlay_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            periodic: false,
            tracked_length: None,
            directions: None,
            overlay_limit: DEFAULT_OVERLAY_LIMIT,
        }
    }
}

impl TrackerConfig {
    /// Validate the configuration.
    ///
    /// Checks that do not depend on the grid; rank checks happen at
    /// construction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tracked_length == Some(0) {
            return Err(ValidationError::TrackedLengthZero);
        }
        if let Some(directions) = &self.directions {
            if directions.is_empty() {
                return Err(ValidationError::NoDirections);
            }
            for (i, &direction) in directions.iter().enumerate() {
                if directions[..i].contains(&direction) {
                    return Err(ValidationError::DuplicateDirection { direction });
                }
            }
        }
        if self.overlay_limit == 0 {
            return Err(ValidationError::InvalidConfig {
                reason: "overlay_limit must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("failed to parse configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ValidationError::InvalidConfig {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&text)
    }
}
