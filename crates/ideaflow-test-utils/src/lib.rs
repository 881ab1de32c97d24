//! Testing utilities for the ideaflow workspace
//!
//! Shared test helpers: a scripted generative backend, valid draft
//! fixtures per step, and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use ideaflow_gateway::{BackendError, GenerationRequest, GenerativeBackend};
use ideaflow_topology::StepNumber;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Install a test tracing subscriber honoring `RUST_LOG`; repeated calls
/// are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<Result<String, BackendError>>,
    requests: Vec<GenerationRequest>,
}

/// A generative backend that replays scripted responses in order and
/// records every request it receives. Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful raw response
    pub fn push_ok(&self, body: impl Into<String>) {
        self.lock().responses.push_back(Ok(body.into()));
    }

    /// Queue a successful JSON response
    pub fn push_json(&self, value: &Value) {
        self.push_ok(value.to_string());
    }

    /// Queue a backend error
    pub fn push_err(&self, err: BackendError) {
        self.lock().responses.push_back(Err(err));
    }

    /// Queue a quota-flavored error with a retry hint
    pub fn push_quota(&self, retry_after_secs: u64) {
        self.push_err(
            BackendError::new("You exceeded your current quota")
                .with_status(429)
                .with_retry_after(retry_after_secs),
        );
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock().requests.clone()
    }

    /// Number of scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("scripted backend exhausted")))
    }
}

/// A draft satisfying the built-in schema for `step`
pub fn valid_draft(step: StepNumber) -> Value {
    match step.get() {
        1 => json!({
            "problem_statement": "Shift workers cannot plan meals around rotating schedules",
            "who_is_affected": "Nurses, factory workers, flight crews",
            "pain_points": ["irregular hours", "decision fatigue", "food waste"],
        }),
        2 => json!({
            "segments": [
                { "name": "Night-shift nurses", "description": "12-hour rotations, hospital cafeterias closed at night" },
            ],
            "early_adopters": "Nurses active in shift-work forums",
        }),
        3 => json!({
            "market_size": "About 20% of the workforce does shift work",
            "trends": ["meal-kit growth", "schedule-aware apps"],
            "opportunities": ["no incumbent targets rotating schedules"],
        }),
        4 => json!({
            "competitors": [
                { "name": "Generic meal kits", "strengths": ["logistics"], "weaknesses": ["fixed delivery windows"] },
            ],
            "differentiation": "Plans keyed to the actual shift rota",
        }),
        5 => json!({
            "headline": "Meals that follow your rota",
            "benefits": ["no planning", "less waste"],
            "proof_points": ["pilot with one hospital ward"],
        }),
        6 => json!({
            "concept": "Rota-synced meal planner with grocery handoff",
            "key_features": ["rota import", "prep-ahead plans"],
            "open_risks": ["rota data access"],
        }),
        8 => json!({
            "script": ["Walk me through your last week of meals"],
            "target_profiles": ["night-shift nurse"],
            "success_criteria": "7 of 10 describe planning pain unprompted",
        }),
        9 => json!({
            "channel": "Landing page with shift-forum ads",
            "hypothesis": "5% of visitors leave an email",
            "metrics": [{ "name": "signup rate", "target": "5%" }],
        }),
        10 => json!({
            "customer_segments": ["night-shift nurses"],
            "value_propositions": ["rota-synced planning"],
            "channels": ["shift-work forums"],
            "customer_relationships": ["self-serve"],
            "revenue_streams": ["monthly subscription"],
            "key_resources": ["rota integrations"],
            "key_activities": ["plan generation"],
            "key_partners": ["grocery delivery"],
            "cost_structure": ["engineering", "support"],
        }),
        11 => json!({
            "model": "subscription",
            "tiers": [{ "name": "Solo", "price": "$9/mo", "includes": ["weekly plans"] }],
            "rationale": "Recurring pain, recurring price",
        }),
        12 => json!({
            "positioning": "The only planner built for rotating shifts",
            "channels": ["forums", "hospital newsletters"],
            "first_90_days": ["pilot ward", "referral loop"],
        }),
        13 => json!({
            "milestones": [{ "name": "Pilot live", "due": "week 2" }],
            "launch_checklist": ["onboarding email", "status page"],
            "announcement": "Launching to the pilot ward first",
        }),
        _ => json!({}),
    }
}

/// A report satisfying the built-in report schema
pub fn valid_report() -> Value {
    json!({
        "summary": "Real pain, narrow wedge, plausible economics",
        "strengths": ["clear segment", "recurring need"],
        "weaknesses": ["rota data access unproven"],
        "recommendations": ["secure one rota integration before launch"],
    })
}

/// A verdict satisfying the built-in verdict schema
pub fn valid_verdict() -> Value {
    json!({
        "decision": "go",
        "confidence": 0.7,
        "reasoning": "Demand test exceeded its target and the wedge is defensible",
    })
}
