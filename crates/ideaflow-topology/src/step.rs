//! Step numbers and the static topology table
//!
//! The fourteen steps ("days") of the workflow are compiled into the program.
//! A malformed topology is unrepresentable: the table is a const array and
//! every lookup goes through a validated [`StepNumber`].

use crate::phase::Phase;
use serde::{Deserialize, Serialize};

/// Number of steps in the workflow
pub const STEP_COUNT: u8 = 14;

/// A requested step number outside the valid topology range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid step number: {0} (valid range 1..={STEP_COUNT})")]
pub struct InvalidStep(pub u8);

/// A validated step number in `1..=14`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct StepNumber(pub(crate) u8);

impl StepNumber {
    /// First step of the workflow
    pub const FIRST: StepNumber = StepNumber(1);
    /// Last step of the workflow
    pub const LAST: StepNumber = StepNumber(STEP_COUNT);

    /// Validate a raw step number
    ///
    /// # Errors
    /// [`InvalidStep`] if `value` is outside `1..=14`.
    #[inline]
    pub fn new(value: u8) -> Result<Self, InvalidStep> {
        if (1..=STEP_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidStep(value))
        }
    }

    /// Raw step number
    #[inline]
    #[must_use]
    pub fn get(&self) -> u8 {
        self.0
    }

    /// The step after this one, if any
    #[inline]
    #[must_use]
    pub fn successor(&self) -> Option<StepNumber> {
        StepNumber::new(self.0 + 1).ok()
    }

    /// Phase this step belongs to
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.entry().phase
    }

    /// Topology entry for this step
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &'static TopologyEntry {
        &TOPOLOGY[(self.0 - 1) as usize]
    }
}

impl TryFrom<u8> for StepNumber {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepNumber> for u8 {
    fn from(step: StepNumber) -> u8 {
        step.0
    }
}

impl std::fmt::Display for StepNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable row of the topology table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyEntry {
    /// Step number (1..=14)
    pub number: StepNumber,
    /// Owning phase
    pub phase: Phase,
    /// Human-readable step title
    pub name: &'static str,
    /// Stable machine identifier
    pub slug: &'static str,
}

/// The fixed 14-step topology, in phase order
pub const TOPOLOGY: [TopologyEntry; STEP_COUNT as usize] = [
    TopologyEntry { number: StepNumber(1), phase: Phase::Discovery, name: "Problem definition", slug: "problem-definition" },
    TopologyEntry { number: StepNumber(2), phase: Phase::Discovery, name: "Target audience", slug: "target-audience" },
    TopologyEntry { number: StepNumber(3), phase: Phase::Discovery, name: "Market landscape", slug: "market-landscape" },
    TopologyEntry { number: StepNumber(4), phase: Phase::Discovery, name: "Competitor scan", slug: "competitor-scan" },
    TopologyEntry { number: StepNumber(5), phase: Phase::Discovery, name: "Value proposition", slug: "value-proposition" },
    TopologyEntry { number: StepNumber(6), phase: Phase::Discovery, name: "Solution sketch", slug: "solution-sketch" },
    TopologyEntry { number: StepNumber(7), phase: Phase::Discovery, name: "Discovery synthesis", slug: "discovery-synthesis" },
    TopologyEntry { number: StepNumber(8), phase: Phase::Validation, name: "Customer interviews", slug: "customer-interviews" },
    TopologyEntry { number: StepNumber(9), phase: Phase::Validation, name: "Demand test", slug: "demand-test" },
    TopologyEntry { number: StepNumber(10), phase: Phase::Validation, name: "Business model", slug: "business-model" },
    TopologyEntry { number: StepNumber(11), phase: Phase::Strategy, name: "Pricing", slug: "pricing" },
    TopologyEntry { number: StepNumber(12), phase: Phase::Strategy, name: "Go-to-market", slug: "go-to-market" },
    TopologyEntry { number: StepNumber(13), phase: Phase::Strategy, name: "Launch plan", slug: "launch-plan" },
    TopologyEntry { number: StepNumber(14), phase: Phase::Decision, name: "Final verdict", slug: "final-verdict" },
];

/// Topology entry for a step
#[inline]
#[must_use]
pub fn entry(step: StepNumber) -> &'static TopologyEntry {
    step.entry()
}

/// Phase a step belongs to
#[inline]
#[must_use]
pub fn phase_of(step: StepNumber) -> Phase {
    step.phase()
}

/// Steps belonging to a phase, in ascending order
#[must_use]
pub fn steps_in_phase(phase: Phase) -> Vec<StepNumber> {
    TOPOLOGY
        .iter()
        .filter(|e| e.phase == phase)
        .map(|e| e.number)
        .collect()
}

/// All step numbers in phase order
#[must_use]
pub fn all_step_numbers() -> Vec<StepNumber> {
    Phase::ALL.iter().flat_map(|p| steps_in_phase(*p)).collect()
}

/// Highest step number in the topology
#[inline]
#[must_use]
pub fn max_step() -> StepNumber {
    StepNumber::LAST
}

/// Last step of the sequential phase; later phases unlock once the
/// current-step pointer moves past it
#[must_use]
pub fn fan_out_gate() -> StepNumber {
    steps_in_phase(Phase::Discovery)
        .last()
        .copied()
        .unwrap_or(StepNumber::FIRST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_number_validation() {
        assert!(StepNumber::new(1).is_ok());
        assert!(StepNumber::new(14).is_ok());
        assert_eq!(StepNumber::new(0), Err(InvalidStep(0)));
        assert_eq!(StepNumber::new(15), Err(InvalidStep(15)));
    }

    #[test]
    fn successor_stops_at_last_step() {
        let thirteen = StepNumber::new(13).unwrap();
        assert_eq!(thirteen.successor(), Some(StepNumber::LAST));
        assert_eq!(StepNumber::LAST.successor(), None);
    }

    #[test]
    fn topology_numbers_are_dense_and_ordered() {
        for (i, entry) in TOPOLOGY.iter().enumerate() {
            assert_eq!(entry.number.get() as usize, i + 1);
        }
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(phase_of(StepNumber::new(7).unwrap()), Phase::Discovery);
        assert_eq!(phase_of(StepNumber::new(8).unwrap()), Phase::Validation);
        assert_eq!(phase_of(StepNumber::new(11).unwrap()), Phase::Strategy);
        assert_eq!(phase_of(StepNumber::new(14).unwrap()), Phase::Decision);
        assert_eq!(fan_out_gate().get(), 7);
    }

    #[test]
    fn all_step_numbers_covers_topology_in_phase_order() {
        let all = all_step_numbers();
        assert_eq!(all.len(), STEP_COUNT as usize);
        let raw: Vec<u8> = all.iter().map(|s| s.get()).collect();
        assert_eq!(raw, (1..=STEP_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn step_number_serde_round_trip() {
        let step = StepNumber::new(9).unwrap();
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, "9");
        let back: StepNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);

        let bad: Result<StepNumber, _> = serde_json::from_str("99");
        assert!(bad.is_err());
    }
}
