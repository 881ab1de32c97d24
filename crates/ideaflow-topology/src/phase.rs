//! Workflow phases
//!
//! Four named phases group the fourteen steps. The first phase is strictly
//! sequential; every later phase fans out once the first phase is complete.

use serde::{Deserialize, Serialize};

/// A named grouping of consecutive steps sharing an unlock rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Days 1-7: problem and audience discovery, strictly sequential
    Discovery,
    /// Days 8-10: evidence gathering, unlocked after Discovery
    Validation,
    /// Days 11-13: pricing and go-to-market, unlocked after Discovery
    Strategy,
    /// Day 14: the final verdict, unlocked after Discovery
    Decision,
}

impl Phase {
    /// All phases in workflow order
    pub const ALL: [Phase; 4] = [
        Phase::Discovery,
        Phase::Validation,
        Phase::Strategy,
        Phase::Decision,
    ];

    /// Whether steps in this phase unlock one at a time
    #[inline]
    #[must_use]
    pub fn is_sequential(&self) -> bool {
        matches!(self, Phase::Discovery)
    }

    /// Whether this phase fans out once the sequential phase completes
    #[inline]
    #[must_use]
    pub fn is_fan_out(&self) -> bool {
        !self.is_sequential()
    }

    /// Human-readable phase name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Discovery => "Discovery",
            Phase::Validation => "Validation",
            Phase::Strategy => "Strategy",
            Phase::Decision => "Decision",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_discovery_is_sequential() {
        assert!(Phase::Discovery.is_sequential());
        assert!(Phase::Validation.is_fan_out());
        assert!(Phase::Strategy.is_fan_out());
        assert!(Phase::Decision.is_fan_out());
    }

    #[test]
    fn phases_in_workflow_order() {
        assert_eq!(Phase::ALL[0], Phase::Discovery);
        assert_eq!(Phase::ALL[3], Phase::Decision);
        assert!(Phase::Discovery < Phase::Decision);
    }
}
