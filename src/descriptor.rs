//! Descriptor kinds and the registry of tracked descriptors.
//!
//! The set of kinds is closed. Adding a kind means adding a variant here and a
//! delta algorithm in [`crate::delta`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::phase::{Phase, PhaseSet};

/// The family a tracked correlation function belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// Two-point function S2: both ends of a lag-r pair are the phase.
    TwoPoint,
    /// Lineal-path function L2: a whole lag-r segment is the phase.
    LinealPath,
    /// Surface-surface function: both ends of a pair are phase boundary cells.
    SurfaceSurface,
    /// Surface-void function: a boundary cell paired with a non-phase cell.
    SurfaceVoid,
}

impl DescriptorKind {
    /// Returns true for the boundary-based kinds.
    #[must_use]
    pub const fn is_surface(self) -> bool {
        matches!(self, Self::SurfaceSurface | Self::SurfaceVoid)
    }

    /// Conventional short name.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::TwoPoint => "S2",
            Self::LinealPath => "L2",
            Self::SurfaceSurface => "SS",
            Self::SurfaceVoid => "SV",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A correlation function paired with the phase it is evaluated for.
///
/// Surface kinds accept a secondary phase. It is recorded and validated but
/// does not change the computed statistic: boundaries are always taken
/// between the primary phase and everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    /// Function family.
    pub kind: DescriptorKind,
    /// Phase the function is evaluated for.
    pub phase: Phase,
    /// Secondary phase for surface kinds (currently inert).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Phase>,
}

impl Descriptor {
    /// Creates a descriptor without a secondary phase.
    #[must_use]
    pub const fn new(kind: DescriptorKind, phase: Phase) -> Self {
        Self {
            kind,
            phase,
            secondary: None,
        }
    }

    /// Two-point function for `phase`.
    #[must_use]
    pub const fn s2(phase: Phase) -> Self {
        Self::new(DescriptorKind::TwoPoint, phase)
    }

    /// Lineal-path function for `phase`.
    #[must_use]
    pub const fn l2(phase: Phase) -> Self {
        Self::new(DescriptorKind::LinealPath, phase)
    }

    /// Surface-surface function for `phase`.
    #[must_use]
    pub const fn surface_surface(phase: Phase) -> Self {
        Self::new(DescriptorKind::SurfaceSurface, phase)
    }

    /// Surface-void function for `phase`.
    #[must_use]
    pub const fn surface_void(phase: Phase) -> Self {
        Self::new(DescriptorKind::SurfaceVoid, phase)
    }

    /// Attaches a secondary phase.
    #[must_use]
    pub const fn with_secondary(mut self, phase: Phase) -> Self {
        self.secondary = Some(phase);
        self
    }

    /// Tracked by default: S2 of phase 1, L2 of phase 1 and L2 of phase 0.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::s2(Phase(1)), Self::l2(Phase(1)), Self::l2(Phase(0))]
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.phase)
    }
}

/// The fixed, ordered set of descriptors a tracker keeps current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRegistry {
    descriptors: Vec<Descriptor>,
}

impl DescriptorRegistry {
    /// Builds a registry, rejecting repeated `(kind, phase)` pairs and labels
    /// the grid does not declare.
    pub fn new(descriptors: Vec<Descriptor>, phases: PhaseSet) -> Result<Self, ValidationError> {
        if descriptors.is_empty() {
            return Err(ValidationError::NoDescriptors);
        }
        for (i, d) in descriptors.iter().enumerate() {
            for phase in std::iter::once(d.phase).chain(d.secondary) {
                if !phases.contains(phase) {
                    return Err(ValidationError::UndeclaredPhase { phase });
                }
            }
            if descriptors[..i]
                .iter()
                .any(|other| other.kind == d.kind && other.phase == d.phase)
            {
                return Err(ValidationError::DuplicateDescriptor {
                    kind: d.kind,
                    phase: d.phase,
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// Registered descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Iterates registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Always false for a constructed registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Position of `(kind, phase)` in registration order.
    #[must_use]
    pub fn position(&self, kind: DescriptorKind, phase: Phase) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|d| d.kind == kind && d.phase == phase)
    }

    /// Number of lags to keep for a grid of the given extents.
    ///
    /// Without a request this is half the smallest extent (at least 1). An
    /// explicit request may reach one lag further, up to `min_extent / 2 + 1`,
    /// so the largest tracked lag is still at most half the smallest extent.
    pub fn tracked_length(requested: Option<usize>, extents: &[usize]) -> Result<usize, ValidationError> {
        if requested == Some(0) {
            return Err(ValidationError::TrackedLengthZero);
        }
        let min_extent = extents
            .iter()
            .copied()
            .min()
            .ok_or(ValidationError::EmptyExtents)?;
        Ok(match requested {
            Some(len) => len.min(min_extent / 2 + 1),
            None => (min_extent / 2).max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_rejects_duplicates() {
        let err = DescriptorRegistry::new(
            vec![Descriptor::s2(Phase(1)), Descriptor::l2(Phase(1)), Descriptor::s2(Phase(1))],
            PhaseSet::binary(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DuplicateDescriptor {
                kind: DescriptorKind::TwoPoint,
                phase: Phase(1)
            }
        ));
    }

    #[test]
    fn secondary_phase_does_not_distinguish_descriptors() {
        let err = DescriptorRegistry::new(
            vec![
                Descriptor::surface_void(Phase(1)),
                Descriptor::surface_void(Phase(1)).with_secondary(Phase(0)),
            ],
            PhaseSet::binary(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateDescriptor { .. }));
    }

    #[test]
    fn registry_rejects_undeclared_phases() {
        let err = DescriptorRegistry::new(vec![Descriptor::l2(Phase(3))], PhaseSet::binary()).unwrap_err();
        assert!(matches!(err, ValidationError::UndeclaredPhase { phase: Phase(3) }));

        let err = DescriptorRegistry::new(
            vec![Descriptor::surface_surface(Phase(1)).with_secondary(Phase(9))],
            PhaseSet::binary(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UndeclaredPhase { phase: Phase(9) }));
    }

    #[test]
    fn registry_keeps_order() {
        let reg = DescriptorRegistry::new(Descriptor::defaults(), PhaseSet::binary()).unwrap();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.position(DescriptorKind::LinealPath, Phase(0)), Some(2));
        assert_eq!(reg.position(DescriptorKind::SurfaceVoid, Phase(0)), None);
        assert_eq!(reg.descriptors()[0].to_string(), "S2(1)");
    }

    #[test]
    fn default_tracked_length_is_half_the_smallest_extent() {
        assert_eq!(DescriptorRegistry::tracked_length(None, &[20, 30]).unwrap(), 10);
        assert_eq!(DescriptorRegistry::tracked_length(None, &[4, 4]).unwrap(), 2);
        assert_eq!(DescriptorRegistry::tracked_length(None, &[3, 9]).unwrap(), 1);
    }

    #[test]
    fn tracked_length_is_capped_by_half_the_smallest_extent() {
        assert_eq!(DescriptorRegistry::tracked_length(Some(3), &[4, 4]).unwrap(), 3);
        assert_eq!(DescriptorRegistry::tracked_length(Some(10), &[4, 9]).unwrap(), 3);
        assert_eq!(DescriptorRegistry::tracked_length(Some(50), &[20, 30]).unwrap(), 11);
        assert_eq!(DescriptorRegistry::tracked_length(None, &[1, 30]).unwrap(), 1);
        assert_eq!(DescriptorRegistry::tracked_length(Some(5), &[1, 30]).unwrap(), 1);
        assert!(matches!(
            DescriptorRegistry::tracked_length(Some(0), &[8]),
            Err(ValidationError::TrackedLengthZero)
        ));
    }
}
