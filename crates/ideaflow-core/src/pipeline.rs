//! Draft generation pipeline
//!
//! One operation: produce (or refresh) the draft for step N of idea I.
//! Context assembly → gateway call → schema validation → per-key merge
//! into the idea's AI profile. Draft generation is best-effort: generic
//! failures are logged and reported as "no draft produced", quota
//! exhaustion propagates distinctly, store failures surface to the caller.

use crate::context;
use crate::error::DraftError;
use crate::store::IdeaStore;
use crate::types::{IdeaId, OwnerId};
use ideaflow_gateway::{
    AggregateKind, GatewayError, GenerationOptions, GenerativeBackend, ModelGateway,
    SchemaRegistry,
};
use ideaflow_topology::{policy_for, StepNumber};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Output budget for report/verdict generation, in tokens
const AGGREGATE_MAX_OUTPUT_TOKENS: u32 = ideaflow_topology::policy::LARGE_MAX_OUTPUT_TOKENS;
/// Timeout for report/verdict generation
const AGGREGATE_TIMEOUT_SECS: u64 = ideaflow_topology::policy::LARGE_TIMEOUT_SECS;

/// Orchestrates context assembly, model invocation, validation and
/// persistence for one idea/step pair
#[derive(Debug)]
pub struct DraftPipeline<B, S> {
    gateway: ModelGateway<B>,
    registry: SchemaRegistry,
    store: Arc<S>,
}

impl<B: GenerativeBackend, S: IdeaStore> DraftPipeline<B, S> {
    /// New pipeline over a gateway, a compiled schema registry and a store
    #[inline]
    #[must_use]
    pub fn new(gateway: ModelGateway<B>, registry: SchemaRegistry, store: Arc<S>) -> Self {
        Self {
            gateway,
            registry,
            store,
        }
    }

    /// Produce (or refresh) the draft for `target` of idea `idea_id`.
    ///
    /// Returns `Ok(None)` when the step is excluded from generation
    /// (synthesis steps, where it is a no-op rather than an error) and when
    /// generation fails
    /// for any generic reason (logged, never surfaced to the triggering
    /// flow). A successful run replaces `ai_profile[target]` wholesale, so
    /// regeneration is idempotent.
    ///
    /// # Errors
    /// - [`DraftError::Quota`] when the backend's quota is hit.
    /// - [`DraftError::Store`] when the idea cannot be read or the draft
    ///   cannot be saved.
    pub async fn generate_draft(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        target: StepNumber,
    ) -> Result<Option<Value>, DraftError> {
        let policy = policy_for(target);
        if !policy.generates {
            tracing::debug!(%idea_id, %target, "step excluded from automatic generation");
            return Ok(None);
        }

        let idea = self.store.fetch_idea(idea_id, owner).await?;
        let ctx = context::assemble(self.store.as_ref(), &idea, target).await?;
        let options = GenerationOptions::for_policy(policy);

        let raw = match self.gateway.invoke(&ctx.system, &ctx.prompt, &options).await {
            Ok(value) => value,
            Err(GatewayError::Quota { retry_after_secs }) => {
                return Err(DraftError::Quota { retry_after_secs });
            }
            Err(err) => {
                tracing::warn!(%idea_id, %target, error = %err, "draft generation failed");
                return Ok(None);
            }
        };

        let draft = match self.registry.validate(target, raw, policy.validation) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%idea_id, %target, error = %err, "generated draft rejected");
                return Ok(None);
            }
        };

        self.store.merge_draft(idea.id, target, draft.clone()).await?;
        tracing::info!(%idea_id, %target, "draft stored");
        Ok(Some(draft))
    }

    /// Generate a cross-step aggregate (report or verdict) over every step
    /// with data.
    ///
    /// Unlike automatic drafts these are explicit user actions, so every
    /// failure propagates, generic ones included.
    pub async fn generate_aggregate(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        kind: AggregateKind,
    ) -> Result<Value, DraftError> {
        let idea = self.store.fetch_idea(idea_id, owner).await?;
        let ctx = context::assemble_all(self.store.as_ref(), &idea).await?;

        let options = GenerationOptions {
            max_output_tokens: AGGREGATE_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(AGGREGATE_TIMEOUT_SECS),
            ..GenerationOptions::default()
        };

        let raw = match self.gateway.invoke(&ctx.system, &ctx.prompt, &options).await {
            Ok(value) => value,
            Err(GatewayError::Quota { retry_after_secs }) => {
                return Err(DraftError::Quota { retry_after_secs });
            }
            Err(err) => return Err(DraftError::Generation(err.to_string())),
        };

        let validated = self
            .registry
            .validate_aggregate(kind, raw)
            .map_err(|err| DraftError::Generation(err.to_string()))?;

        match kind {
            AggregateKind::Report => {
                self.store.set_report(idea.id, validated.clone()).await?;
            }
            AggregateKind::Verdict => {
                self.store.set_verdict(idea.id, validated.clone()).await?;
            }
        }
        tracing::info!(%idea_id, ?kind, "aggregate stored");
        Ok(validated)
    }

    /// The underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
