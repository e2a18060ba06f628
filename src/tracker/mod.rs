//! The correlation tracker.
//!
//! A [`CorrelationTracker`] owns a grid, the registry of tracked descriptors,
//! the tracked directions and one correlation buffer per
//! `(direction, descriptor)` pair. Buffers are filled once at construction
//! and afterwards kept current by the delta engine on every write.

mod builder;
mod soft;
mod transaction;

pub use builder::TrackerBuilder;
pub use transaction::RollbackToken;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::correlation::{CorrelationBuffers, CorrelationData};
use crate::delta::DeltaEngine;
use crate::descriptor::{Descriptor, DescriptorKind, DescriptorRegistry};
use crate::direction::Direction;
use crate::error::{AccessError, TrackerResult, ValidationError};
use crate::grid::Grid;
use crate::phase::Phase;

/// Stable identifier for a tracker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackerId(Uuid);

impl TrackerId {
    /// Create a new random tracker ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash of everything observable about a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateDigest([u8; 32]);

impl StateDigest {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Keeps directional correlation functions of a grid current under
/// single-element writes.
pub struct CorrelationTracker {
    id: TrackerId,
    grid: Grid,
    registry: Arc<DescriptorRegistry>,
    directions: Arc<[Direction]>,
    periodic: bool,
    tracked_length: usize,
    buffers: CorrelationBuffers,
    // Version of the current state and the last version handed out. Rollback
    // tokens are only accepted while `version` still equals the version they
    // produced.
    version: u64,
    issued: u64,
}

impl fmt::Debug for CorrelationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationTracker")
            .field("id", &self.id)
            .field("grid", &self.grid)
            .field("descriptors", &self.registry.descriptors())
            .field("directions", &self.directions)
            .field("periodic", &self.periodic)
            .field("tracked_length", &self.tracked_length)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Two trackers are equal when they are observationally identical; ids and
/// versions are ignored.
impl PartialEq for CorrelationTracker {
    fn eq(&self, other: &Self) -> bool {
        self.periodic == other.periodic
            && self.tracked_length == other.tracked_length
            && self.directions == other.directions
            && self.registry == other.registry
            && self.buffers == other.buffers
            && self.grid == other.grid
    }
}

impl Eq for CorrelationTracker {}

/// Clones share grid storage copy-on-write and receive a fresh id, so
/// rollback tokens of the source are not accepted by the clone.
impl Clone for CorrelationTracker {
    fn clone(&self) -> Self {
        Self {
            id: TrackerId::new(),
            grid: self.grid.clone(),
            registry: Arc::clone(&self.registry),
            directions: Arc::clone(&self.directions),
            periodic: self.periodic,
            tracked_length: self.tracked_length,
            buffers: self.buffers.clone(),
            version: 0,
            issued: 0,
        }
    }
}

impl CorrelationTracker {
    /// Builds a tracker, paying for one full computation of every buffer.
    pub fn new(mut grid: Grid, descriptors: Vec<Descriptor>, config: &TrackerConfig) -> TrackerResult<Self> {
        config.validate()?;
        let registry = DescriptorRegistry::new(descriptors, grid.phases())?;

        let directions = config
            .directions
            .clone()
            .unwrap_or_else(|| Direction::axes(grid.ndim()));
        for &direction in &directions {
            let required = direction.required_rank();
            if required > grid.ndim() {
                return Err(ValidationError::DirectionOutOfRank {
                    direction,
                    required,
                    ndim: grid.ndim(),
                }
                .into());
            }
        }

        let tracked_length = DescriptorRegistry::tracked_length(config.tracked_length, grid.extents())?;
        grid.set_overlay_limit(config.overlay_limit);
        let buffers = CorrelationBuffers::initialize(&grid, &registry, &directions, config.periodic, tracked_length);

        let tracker = Self {
            id: TrackerId::new(),
            grid,
            registry: Arc::new(registry),
            directions: directions.into(),
            periodic: config.periodic,
            tracked_length,
            buffers,
            version: 0,
            issued: 0,
        };
        debug!(
            id = %tracker.id,
            extents = ?tracker.grid.extents(),
            descriptors = tracker.registry.len(),
            directions = tracker.directions.len(),
            tracked_length,
            periodic = tracker.periodic,
            "correlation tracker initialized"
        );
        Ok(tracker)
    }

    /// Starts a builder over `grid`.
    #[must_use]
    pub fn builder(grid: Grid) -> TrackerBuilder {
        TrackerBuilder::new(grid)
    }

    /// This tracker's identity.
    #[must_use]
    pub const fn id(&self) -> TrackerId {
        self.id
    }

    /// The tracked grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reads one element.
    pub fn get(&self, coord: &[usize]) -> TrackerResult<Phase> {
        Ok(self.grid.get(coord)?)
    }

    /// Tracked descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[Descriptor] {
        self.registry.descriptors()
    }

    /// Tracked `(kind, phase)` pairs in registration order.
    #[must_use]
    pub fn tracked_descriptors(&self) -> Vec<(DescriptorKind, Phase)> {
        self.registry.iter().map(|d| (d.kind, d.phase)).collect()
    }

    /// Number of lags held per buffer.
    #[must_use]
    pub const fn tracked_length(&self) -> usize {
        self.tracked_length
    }

    /// Tracked directions in construction order.
    #[must_use]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Returns true if neighbourhoods wrap at the grid edges.
    #[must_use]
    pub const fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Current correlation function for `(kind, phase)` along `direction`.
    ///
    /// Returns a copy; the tracker's buffers are never exposed.
    pub fn descriptor(&self, kind: DescriptorKind, phase: Phase, direction: Direction) -> TrackerResult<CorrelationData> {
        let k = self
            .registry
            .position(kind, phase)
            .ok_or(AccessError::UnsupportedDescriptorKind { kind, phase })?;
        let d = self
            .directions
            .iter()
            .position(|&x| x == direction)
            .ok_or(AccessError::UntrackedDirection { direction })?;
        Ok(self.buffers.get(d, k))
    }

    /// Current correlation function for `(kind, phase)` along every tracked
    /// direction.
    pub fn correlations(&self, kind: DescriptorKind, phase: Phase) -> TrackerResult<Vec<(Direction, CorrelationData)>> {
        let k = self
            .registry
            .position(kind, phase)
            .ok_or(AccessError::UnsupportedDescriptorKind { kind, phase })?;
        Ok(self
            .directions
            .iter()
            .enumerate()
            .map(|(d, &direction)| (direction, self.buffers.get(d, k)))
            .collect())
    }

    /// Recomputes every buffer from scratch and compares with the cache.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let fresh = CorrelationBuffers::initialize(
            &self.grid,
            &self.registry,
            &self.directions,
            self.periodic,
            self.tracked_length,
        );
        fresh == self.buffers
    }

    /// Hash over grid contents, configuration and buffer contents.
    #[must_use]
    pub fn digest(&self) -> StateDigest {
        let mut h = blake3::Hasher::new();
        h.update(b"corrtrack/state/v1");
        for &extent in self.grid.extents() {
            h.update(&(extent as u64).to_le_bytes());
        }
        let labels: Vec<u8> = self.grid.iter().map(Phase::value).collect();
        h.update(&labels);
        for d in self.registry.iter() {
            let secondary = d.secondary.map_or([0, 0], |p| [1, p.value()]);
            h.update(&[d.kind as u8, d.phase.value(), secondary[0], secondary[1]]);
        }
        for direction in self.directions.iter() {
            h.update(direction.to_string().as_bytes());
            h.update(b"/");
        }
        h.update(&[u8::from(self.periodic)]);
        h.update(&(self.tracked_length as u64).to_le_bytes());
        for count in self.buffers.counts() {
            h.update(&count.to_le_bytes());
        }
        StateDigest(*h.finalize().as_bytes())
    }

    pub(crate) fn engine(&self) -> DeltaEngine<'_> {
        DeltaEngine {
            grid: &self.grid,
            registry: &self.registry,
            directions: &self.directions,
            periodic: self.periodic,
            tracked_length: self.tracked_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::reference;
    use crate::error::TrackerError;
    use crate::phase::PhaseSet;

    fn grid() -> Grid {
        Grid::from_labels(
            vec![4, 4],
            [
                1, 0, 1, 1, //
                0, 1, 1, 0, //
                1, 1, 0, 0, //
                0, 1, 0, 1,
            ],
            PhaseSet::binary(),
        )
        .unwrap()
    }

    #[test]
    fn new_fills_buffers_from_scratch() {
        let t = CorrelationTracker::new(grid(), Descriptor::defaults(), &TrackerConfig::default()).unwrap();
        assert_eq!(t.tracked_length(), 2);
        assert_eq!(t.directions(), &[Direction::X, Direction::Y]);
        assert!(t.is_consistent());

        let expected = reference::l2(&grid(), Phase(0), Direction::Y, false, 2);
        assert_eq!(t.descriptor(DescriptorKind::LinealPath, Phase(0), Direction::Y).unwrap(), expected);
    }

    #[test]
    fn new_rejects_bad_input() {
        let err = CorrelationTracker::new(
            grid(),
            vec![Descriptor::s2(Phase(1)), Descriptor::s2(Phase(1))],
            &TrackerConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::DuplicateDescriptor { .. })
        ));

        let config = TrackerConfig {
            directions: Some(vec![Direction::X, Direction::YZ]),
            ..TrackerConfig::default()
        };
        let err = CorrelationTracker::new(grid(), Descriptor::defaults(), &config).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::DirectionOutOfRank { required: 3, .. })
        ));
    }

    #[test]
    fn reads_report_unknown_descriptors_and_directions() {
        let t = CorrelationTracker::new(grid(), vec![Descriptor::s2(Phase(1))], &TrackerConfig::default()).unwrap();
        let err = t.descriptor(DescriptorKind::LinealPath, Phase(1), Direction::X).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Access(AccessError::UnsupportedDescriptorKind { .. })
        ));
        let err = t.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::XY).unwrap_err();
        assert!(matches!(err, TrackerError::Access(AccessError::UntrackedDirection { .. })));
        assert!(matches!(t.get(&[4, 0]), Err(TrackerError::Access(AccessError::OutOfBounds { .. }))));
    }

    #[test]
    fn correlations_cover_every_direction() {
        let t = CorrelationTracker::new(grid(), Descriptor::defaults(), &TrackerConfig::default()).unwrap();
        let all = t.correlations(DescriptorKind::TwoPoint, Phase(1)).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].0, Direction::Y);
        assert_eq!(all[1].1, t.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::Y).unwrap());
        assert_eq!(
            t.tracked_descriptors(),
            vec![
                (DescriptorKind::TwoPoint, Phase(1)),
                (DescriptorKind::LinealPath, Phase(1)),
                (DescriptorKind::LinealPath, Phase(0)),
            ]
        );
    }

    #[test]
    fn clones_compare_equal_but_have_new_ids() {
        let t = CorrelationTracker::new(grid(), Descriptor::defaults(), &TrackerConfig::default()).unwrap();
        let c = t.clone();
        assert_eq!(t, c);
        assert_ne!(t.id(), c.id());
        assert_eq!(t.digest(), c.digest());
        assert!(c.grid().shares_storage_with(t.grid()));
    }

    #[test]
    fn digest_depends_on_boundary_mode() {
        let a = CorrelationTracker::new(grid(), Descriptor::defaults(), &TrackerConfig::default()).unwrap();
        let config = TrackerConfig {
            periodic: true,
            ..TrackerConfig::default()
        };
        let b = CorrelationTracker::new(grid(), Descriptor::defaults(), &config).unwrap();
        assert_ne!(a.digest(), b.digest());
        assert_ne!(a, b);
        assert_eq!(a.digest().to_string().len(), 64);
    }
}
