//! Core types for the idea-validation workflow
//!
//! The central aggregate is [`Idea`]: a seed description, a monotone
//! current-step pointer into the topology, and the sparse per-step
//! [`AiProfile`] of generated drafts.

use chrono::{DateTime, Utc};
use ideaflow_topology::{IdeaStatus, StepNumber, StepStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use ulid::Ulid;

/// Unique idea identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdeaId(pub Ulid);

impl IdeaId {
    /// Generate new idea ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for IdeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IdeaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique owner identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Ulid);

impl OwnerId {
    /// Generate new owner ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sparse map from step number to that step's stored draft.
///
/// Writes are full per-key replaces; regeneration overwrites, never
/// accumulates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    entries: BTreeMap<StepNumber, Value>,
}

impl AiProfile {
    /// Empty profile
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored draft for a step, if any
    #[inline]
    #[must_use]
    pub fn get(&self, step: StepNumber) -> Option<&Value> {
        self.entries.get(&step)
    }

    /// Replace the draft for a step
    pub fn insert(&mut self, step: StepNumber, draft: Value) {
        self.entries.insert(step, draft);
    }

    /// Number of steps with a stored draft
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no step has a draft yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drafts in ascending step order
    pub fn iter(&self) -> impl Iterator<Item = (StepNumber, &Value)> {
        self.entries.iter().map(|(s, v)| (*s, v))
    }
}

/// The central aggregate: one user's run through the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    /// Identity
    pub id: IdeaId,
    /// Owning user
    pub owner: OwnerId,
    /// The user's seed description of the idea
    pub seed: String,
    /// Pointer into the topology, `1..=15`; 15 means fully walked.
    /// Monotonically advanced, never decreased.
    pub current_step: u8,
    /// Overall lifecycle status
    pub status: IdeaStatus,
    /// Per-step generated drafts
    pub ai_profile: AiProfile,
    /// Cross-step validation report, once generated
    pub report: Option<Value>,
    /// Final go/pivot/kill verdict, once generated
    pub verdict: Option<Value>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// New idea starting at step 1
    #[must_use]
    pub fn new(owner: OwnerId, seed: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: IdeaId::new(),
            owner,
            seed: seed.into(),
            current_step: StepNumber::FIRST.get(),
            status: IdeaStatus::Active,
            ai_profile: AiProfile::new(),
            report: None,
            verdict: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Unlock state of a step for this idea
    #[inline]
    #[must_use]
    pub fn step_status(&self, step: StepNumber) -> StepStatus {
        ideaflow_topology::step_status(step, self.current_step, self.status)
    }
}

/// User-submitted answers for one (idea, step), overwritten on resubmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    /// Step the answers belong to
    pub step: StepNumber,
    /// Free-form structured answers
    pub content: Value,
    /// Last submission time
    pub updated_at: DateTime<Utc>,
}

/// Acknowledgement returned to the caller of a step submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Idea the submission belongs to
    pub idea_id: IdeaId,
    /// Step that was submitted
    pub step: StepNumber,
    /// Step whose draft generation was queued as a side effect, if any
    pub draft_queued: Option<StepNumber>,
}

/// Everything the external step-fetch route needs to render one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    /// The step in question
    pub step: StepNumber,
    /// Unlock state
    pub status: StepStatus,
    /// Persisted user answers, if any
    pub input: Option<Value>,
    /// Stored draft, if any
    pub draft: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(n: u8) -> StepNumber {
        StepNumber::new(n).unwrap()
    }

    #[test]
    fn idea_ids_are_unique() {
        assert_ne!(IdeaId::new(), IdeaId::new());
    }

    #[test]
    fn new_idea_starts_at_step_one() {
        let idea = Idea::new(OwnerId::new(), "meal planning for shift workers");
        assert_eq!(idea.current_step, 1);
        assert_eq!(idea.status, IdeaStatus::Active);
        assert!(idea.ai_profile.is_empty());
        assert_eq!(idea.step_status(step(1)), StepStatus::Current);
    }

    #[test]
    fn profile_insert_replaces_the_key() {
        let mut profile = AiProfile::new();
        profile.insert(step(2), json!({ "v": 1 }));
        profile.insert(step(2), json!({ "v": 2 }));
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get(step(2)), Some(&json!({ "v": 2 })));
    }

    #[test]
    fn profile_iterates_in_step_order() {
        let mut profile = AiProfile::new();
        profile.insert(step(9), json!(9));
        profile.insert(step(1), json!(1));
        profile.insert(step(4), json!(4));
        let order: Vec<u8> = profile.iter().map(|(s, _)| s.get()).collect();
        assert_eq!(order, vec![1, 4, 9]);
    }
}
