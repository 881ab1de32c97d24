//! Persistence seam
//!
//! The relational store of a deployment lives behind [`IdeaStore`]; this
//! core only requires the handful of operations named here. The contract
//! that matters for correctness: [`IdeaStore::merge_draft`] is an atomic
//! partial update of one `ai_profile` key, never a whole-map replace from
//! a stale read, so concurrent generations for two different steps of the
//! same idea cannot lose each other's result.

use crate::types::{Idea, IdeaId, OwnerId, StepInput};
use async_trait::async_trait;
use ideaflow_topology::{IdeaStatus, StepNumber};
use serde_json::Value;

/// A store-level failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Record missing or not owned by the requester
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything the backing store reports
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence operations required by the workflow core.
///
/// All idea mutation in the system goes through the submission orchestrator
/// (inputs, pointer, status) or the draft pipeline (`ai_profile`); no other
/// component writes idea state.
#[async_trait]
pub trait IdeaStore: Send + Sync + 'static {
    /// Create a new idea at step 1 for `owner`
    async fn create_idea(&self, owner: OwnerId, seed: String) -> Result<Idea, StoreError>;

    /// Fetch an idea by id, scoped to its owner.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when the idea does not exist or belongs to
    /// someone else; the two cases are indistinguishable to the caller.
    async fn fetch_idea(&self, id: IdeaId, owner: OwnerId) -> Result<Idea, StoreError>;

    /// Create or overwrite the user's answers for `(idea, step)`
    async fn upsert_step_input(
        &self,
        idea: IdeaId,
        step: StepNumber,
        content: Value,
    ) -> Result<StepInput, StoreError>;

    /// The stored answers for `(idea, step)`, if any
    async fn step_input(
        &self,
        idea: IdeaId,
        step: StepNumber,
    ) -> Result<Option<StepInput>, StoreError>;

    /// All stored answers for an idea, ascending by step
    async fn step_inputs(&self, idea: IdeaId) -> Result<Vec<StepInput>, StoreError>;

    /// Atomically replace `ai_profile[step]` for an idea
    async fn merge_draft(
        &self,
        idea: IdeaId,
        step: StepNumber,
        draft: Value,
    ) -> Result<(), StoreError>;

    /// Advance the current-step pointer. Implementations must keep the
    /// pointer monotone: a value below the stored one is ignored.
    async fn set_current_step(&self, idea: IdeaId, current_step: u8) -> Result<(), StoreError>;

    /// Update the overall lifecycle status
    async fn set_status(&self, idea: IdeaId, status: IdeaStatus) -> Result<(), StoreError>;

    /// Store the cross-step validation report
    async fn set_report(&self, idea: IdeaId, report: Value) -> Result<(), StoreError>;

    /// Store the final verdict
    async fn set_verdict(&self, idea: IdeaId, verdict: Value) -> Result<(), StoreError>;
}
