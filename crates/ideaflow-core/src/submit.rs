//! Step submission orchestrator
//!
//! The write-side entry points of the core: submit a step's answers,
//! confirm (lock) the current step, fetch a step's state, regenerate a
//! draft on demand, and produce the report/verdict aggregates.
//!
//! Draft prefetch for the next step is handed to a dedicated worker task
//! over a bounded channel: the user's submission is acknowledged without
//! waiting, each queued job runs to completion, and every outcome is
//! logged so no trigger is silently dropped.

use crate::error::CoreError;
use crate::pipeline::DraftPipeline;
use crate::store::IdeaStore;
use crate::types::{Idea, IdeaId, OwnerId, StepView, SubmissionAck};
use ideaflow_gateway::{AggregateKind, GenerativeBackend};
use ideaflow_topology::{is_workflow_complete, policy_for, IdeaStatus, StepNumber};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Bound on queued background draft jobs
pub const DRAFT_QUEUE_DEPTH: usize = 32;

/// One background draft-generation trigger
#[derive(Debug, Clone, Copy)]
struct DraftJob {
    idea_id: IdeaId,
    owner: OwnerId,
    step: StepNumber,
}

/// User-facing orchestration over the store and the draft pipeline
#[derive(Debug)]
pub struct SubmissionOrchestrator<B, S> {
    store: Arc<S>,
    pipeline: Arc<DraftPipeline<B, S>>,
    jobs: mpsc::Sender<DraftJob>,
    worker: JoinHandle<()>,
}

impl<B: GenerativeBackend, S: IdeaStore> SubmissionOrchestrator<B, S> {
    /// New orchestrator; spawns the draft worker, so a tokio runtime must
    /// be running
    #[must_use]
    pub fn new(store: Arc<S>, pipeline: Arc<DraftPipeline<B, S>>) -> Self {
        let (jobs, rx) = mpsc::channel(DRAFT_QUEUE_DEPTH);
        let worker = tokio::spawn(draft_worker(Arc::clone(&pipeline), rx));
        Self {
            store,
            pipeline,
            jobs,
            worker,
        }
    }

    /// Start a new idea at step 1
    pub async fn start_idea(&self, owner: OwnerId, seed: String) -> Result<Idea, CoreError> {
        let idea = self.store.create_idea(owner, seed).await?;
        tracing::info!(idea_id = %idea.id, "idea created");
        Ok(idea)
    }

    /// Persist the user's answers for a step and queue draft generation for
    /// the step after it.
    ///
    /// The submission itself never advances the current-step pointer, and a
    /// draft-generation failure never fails the submission: the ack only
    /// reports whether a prefetch job was queued.
    pub async fn submit(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        step: StepNumber,
        answers: Value,
    ) -> Result<SubmissionAck, CoreError> {
        // Ownership check up front; a stranger's submit must not write.
        self.store.fetch_idea(idea_id, owner).await?;
        self.store.upsert_step_input(idea_id, step, answers).await?;
        tracing::debug!(%idea_id, %step, "step input stored");

        let next = step.successor().filter(|n| policy_for(*n).generates);
        let draft_queued = match next {
            Some(n) => {
                let job = DraftJob {
                    idea_id,
                    owner,
                    step: n,
                };
                match self.jobs.send(job).await {
                    Ok(()) => Some(n),
                    Err(_) => {
                        tracing::error!(%idea_id, step = %n, "draft worker gone, prefetch skipped");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(SubmissionAck {
            idea_id,
            step,
            draft_queued,
        })
    }

    /// Confirm (lock) the current step, advancing the pointer by one.
    ///
    /// Only the step under the pointer can be confirmed; confirming the
    /// last step marks the idea completed.
    pub async fn confirm_step(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        step: StepNumber,
    ) -> Result<Idea, CoreError> {
        let idea = self.store.fetch_idea(idea_id, owner).await?;
        if step.get() != idea.current_step {
            return Err(CoreError::StepNotCurrent {
                step,
                current_step: idea.current_step,
            });
        }

        let next = step.get() + 1;
        self.store.set_current_step(idea_id, next).await?;
        if is_workflow_complete(next) {
            self.store.set_status(idea_id, IdeaStatus::Completed).await?;
            tracing::info!(%idea_id, "workflow complete");
        }
        Ok(self.store.fetch_idea(idea_id, owner).await?)
    }

    /// Status, stored input and stored draft for one step
    pub async fn step_state(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        step: StepNumber,
    ) -> Result<StepView, CoreError> {
        let idea = self.store.fetch_idea(idea_id, owner).await?;
        let input = self
            .store
            .step_input(idea_id, step)
            .await?
            .map(|i| i.content);
        Ok(StepView {
            step,
            status: idea.step_status(step),
            input,
            draft: idea.ai_profile.get(step).cloned(),
        })
    }

    /// Regenerate a step's draft on explicit user request.
    ///
    /// Runs synchronously; quota exhaustion surfaces as the retryable
    /// [`CoreError::QuotaExceeded`] so the caller can show a retry-after
    /// hint instead of a hard failure.
    pub async fn regenerate(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
        step: StepNumber,
    ) -> Result<Option<Value>, CoreError> {
        Ok(self.pipeline.generate_draft(idea_id, owner, step).await?)
    }

    /// Generate and store the cross-step validation report
    pub async fn generate_report(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
    ) -> Result<Value, CoreError> {
        Ok(self
            .pipeline
            .generate_aggregate(idea_id, owner, AggregateKind::Report)
            .await?)
    }

    /// Generate and store the final verdict, concluding the idea
    pub async fn generate_verdict(
        &self,
        idea_id: IdeaId,
        owner: OwnerId,
    ) -> Result<Value, CoreError> {
        let verdict = self
            .pipeline
            .generate_aggregate(idea_id, owner, AggregateKind::Verdict)
            .await?;
        self.store.set_status(idea_id, IdeaStatus::Completed).await?;
        Ok(verdict)
    }

    /// Close the draft queue and wait for queued jobs to finish
    pub async fn shutdown(self) {
        drop(self.jobs);
        if let Err(err) = self.worker.await {
            tracing::error!(error = %err, "draft worker ended abnormally");
        }
    }
}

/// Runs queued draft jobs to completion, logging every outcome
async fn draft_worker<B: GenerativeBackend, S: IdeaStore>(
    pipeline: Arc<DraftPipeline<B, S>>,
    mut rx: mpsc::Receiver<DraftJob>,
) {
    while let Some(job) = rx.recv().await {
        match pipeline
            .generate_draft(job.idea_id, job.owner, job.step)
            .await
        {
            Ok(Some(_)) => {
                tracing::debug!(idea_id = %job.idea_id, step = %job.step, "prefetched draft");
            }
            Ok(None) => {
                tracing::debug!(idea_id = %job.idea_id, step = %job.step, "no draft produced");
            }
            Err(err) => {
                tracing::warn!(
                    idea_id = %job.idea_id,
                    step = %job.step,
                    error = %err,
                    "background draft generation failed"
                );
            }
        }
    }
}
