//! Phase labels and declared phase sets.
//!
//! A grid element holds one small integer label. The set of labels a grid may
//! contain is fixed when the grid is created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A discrete phase label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phase(pub u8);

impl Phase {
    /// Returns the raw label.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Phase {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<bool> for Phase {
    fn from(value: bool) -> Self {
        Self(u8::from(value))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The finite set of labels a grid may hold.
///
/// Stored as a 256-bit mask so membership checks on the write path are a
/// single bit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhaseSet {
    bits: [u64; 4],
}

impl PhaseSet {
    /// The two-phase set `{0, 1}`.
    #[must_use]
    pub const fn binary() -> Self {
        Self { bits: [0b11, 0, 0, 0] }
    }

    /// Builds a set from the given labels, rejecting an empty list.
    pub fn new<I>(phases: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Phase>,
    {
        let mut set = Self::default();
        for phase in phases {
            set.insert(phase);
        }
        if set.is_empty() {
            return Err(ValidationError::EmptyPhaseSet);
        }
        Ok(set)
    }

    /// The labels `0..count`.
    pub fn range(count: u16) -> Result<Self, ValidationError> {
        #[allow(clippy::cast_possible_truncation)]
        Self::new((0..count.min(256)).map(|v| Phase(v as u8)))
    }

    fn insert(&mut self, phase: Phase) {
        let v = usize::from(phase.0);
        self.bits[v / 64] |= 1u64 << (v % 64);
    }

    /// Returns true if `phase` is declared.
    #[must_use]
    pub const fn contains(&self, phase: Phase) -> bool {
        let v = phase.0 as usize;
        self.bits[v / 64] & (1u64 << (v % 64)) != 0
    }

    /// Number of declared labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no label is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Iterates the declared labels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Phase> + '_ {
        (0u8..=u8::MAX)
            .map(Phase)
            .filter(move |&p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_set_holds_zero_and_one() {
        let set = PhaseSet::binary();
        assert!(set.contains(Phase(0)));
        assert!(set.contains(Phase(1)));
        assert!(!set.contains(Phase(2)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn new_rejects_empty_list() {
        assert!(matches!(
            PhaseSet::new(Vec::new()),
            Err(ValidationError::EmptyPhaseSet)
        ));
    }

    #[test]
    fn high_labels_are_tracked() {
        let set = PhaseSet::new([Phase(3), Phase(200), Phase(255)]).unwrap();
        assert!(set.contains(Phase(255)));
        assert!(set.contains(Phase(200)));
        assert!(!set.contains(Phase(199)));
        let labels: Vec<u8> = set.iter().map(Phase::value).collect();
        assert_eq!(labels, vec![3, 200, 255]);
    }

    #[test]
    fn range_declares_consecutive_labels() {
        let set = PhaseSet::range(3).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(Phase(2)));
        assert!(!set.contains(Phase(3)));
    }

    #[test]
    fn phase_from_bool() {
        assert_eq!(Phase::from(true), Phase(1));
        assert_eq!(Phase::from(false), Phase(0));
    }
}
