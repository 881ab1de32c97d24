//! In-memory reference store
//!
//! `DashMap`-backed [`IdeaStore`] used by tests and by embedders that do
//! not need durability. Per-idea mutation goes through the shard-locked
//! entry, which is what makes `merge_draft` atomic per key.

use crate::store::{IdeaStore, StoreError};
use crate::types::{Idea, IdeaId, OwnerId, StepInput};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use ideaflow_topology::{IdeaStatus, StepNumber, COMPLETION_POINTER};
use serde_json::Value;

/// In-memory [`IdeaStore`] implementation
#[derive(Debug, Default)]
pub struct InMemoryIdeaStore {
    ideas: DashMap<IdeaId, Idea>,
    inputs: DashMap<(IdeaId, u8), StepInput>,
}

impl InMemoryIdeaStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ideas stored
    #[inline]
    #[must_use]
    pub fn idea_count(&self) -> usize {
        self.ideas.len()
    }

    fn with_idea<T>(
        &self,
        id: IdeaId,
        mutate: impl FnOnce(&mut Idea) -> T,
    ) -> Result<T, StoreError> {
        let mut entry = self
            .ideas
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("idea {id}")))?;
        let out = mutate(&mut entry);
        entry.updated_at = Utc::now();
        Ok(out)
    }
}

#[async_trait]
impl IdeaStore for InMemoryIdeaStore {
    async fn create_idea(&self, owner: OwnerId, seed: String) -> Result<Idea, StoreError> {
        let idea = Idea::new(owner, seed);
        self.ideas.insert(idea.id, idea.clone());
        Ok(idea)
    }

    async fn fetch_idea(&self, id: IdeaId, owner: OwnerId) -> Result<Idea, StoreError> {
        self.ideas
            .get(&id)
            .filter(|idea| idea.owner == owner)
            .map(|idea| idea.clone())
            .ok_or_else(|| StoreError::NotFound(format!("idea {id}")))
    }

    async fn upsert_step_input(
        &self,
        idea: IdeaId,
        step: StepNumber,
        content: Value,
    ) -> Result<StepInput, StoreError> {
        if !self.ideas.contains_key(&idea) {
            return Err(StoreError::NotFound(format!("idea {idea}")));
        }
        let input = StepInput {
            step,
            content,
            updated_at: Utc::now(),
        };
        self.inputs.insert((idea, step.get()), input.clone());
        Ok(input)
    }

    async fn step_input(
        &self,
        idea: IdeaId,
        step: StepNumber,
    ) -> Result<Option<StepInput>, StoreError> {
        Ok(self.inputs.get(&(idea, step.get())).map(|i| i.clone()))
    }

    async fn step_inputs(&self, idea: IdeaId) -> Result<Vec<StepInput>, StoreError> {
        let mut inputs: Vec<StepInput> = self
            .inputs
            .iter()
            .filter(|entry| entry.key().0 == idea)
            .map(|entry| entry.value().clone())
            .collect();
        inputs.sort_by_key(|i| i.step);
        Ok(inputs)
    }

    async fn merge_draft(
        &self,
        idea: IdeaId,
        step: StepNumber,
        draft: Value,
    ) -> Result<(), StoreError> {
        self.with_idea(idea, |idea| idea.ai_profile.insert(step, draft))
    }

    async fn set_current_step(&self, idea: IdeaId, current_step: u8) -> Result<(), StoreError> {
        self.with_idea(idea, |idea| {
            let bounded = current_step.min(COMPLETION_POINTER);
            if bounded > idea.current_step {
                idea.current_step = bounded;
            }
        })
    }

    async fn set_status(&self, idea: IdeaId, status: IdeaStatus) -> Result<(), StoreError> {
        self.with_idea(idea, |idea| idea.status = status)
    }

    async fn set_report(&self, idea: IdeaId, report: Value) -> Result<(), StoreError> {
        self.with_idea(idea, |idea| idea.report = Some(report))
    }

    async fn set_verdict(&self, idea: IdeaId, verdict: Value) -> Result<(), StoreError> {
        self.with_idea(idea, |idea| idea.verdict = Some(verdict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn step(n: u8) -> StepNumber {
        StepNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn fetch_is_owner_scoped() {
        let store = InMemoryIdeaStore::new();
        let owner = OwnerId::new();
        let idea = store.create_idea(owner, "test seed".to_string()).await.unwrap();

        assert!(store.fetch_idea(idea.id, owner).await.is_ok());
        let stranger = OwnerId::new();
        assert!(matches!(
            store.fetch_idea(idea.id, stranger).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn upsert_overwrites_without_history() {
        let store = InMemoryIdeaStore::new();
        let owner = OwnerId::new();
        let idea = store.create_idea(owner, "seed".to_string()).await.unwrap();

        store.upsert_step_input(idea.id, step(1), json!({ "v": 1 })).await.unwrap();
        store.upsert_step_input(idea.id, step(1), json!({ "v": 2 })).await.unwrap();

        let inputs = store.step_inputs(idea.id).await.unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].content, json!({ "v": 2 }));
    }

    #[tokio::test]
    async fn step_inputs_come_back_in_step_order() {
        let store = InMemoryIdeaStore::new();
        let owner = OwnerId::new();
        let idea = store.create_idea(owner, "seed".to_string()).await.unwrap();

        for n in [5u8, 1, 3] {
            store.upsert_step_input(idea.id, step(n), json!({ "n": n })).await.unwrap();
        }
        let order: Vec<u8> = store
            .step_inputs(idea.id)
            .await
            .unwrap()
            .iter()
            .map(|i| i.step.get())
            .collect();
        assert_eq!(order, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn pointer_never_decreases() {
        let store = InMemoryIdeaStore::new();
        let owner = OwnerId::new();
        let idea = store.create_idea(owner, "seed".to_string()).await.unwrap();

        store.set_current_step(idea.id, 6).await.unwrap();
        store.set_current_step(idea.id, 3).await.unwrap();
        assert_eq!(store.fetch_idea(idea.id, owner).await.unwrap().current_step, 6);

        store.set_current_step(idea.id, 99).await.unwrap();
        assert_eq!(
            store.fetch_idea(idea.id, owner).await.unwrap().current_step,
            COMPLETION_POINTER
        );
    }

    #[tokio::test]
    async fn concurrent_merges_for_different_steps_keep_both_keys() {
        let store = Arc::new(InMemoryIdeaStore::new());
        let owner = OwnerId::new();
        let idea = store.create_idea(owner, "seed".to_string()).await.unwrap();

        let mut joins = Vec::new();
        for n in 1..=6u8 {
            let store = Arc::clone(&store);
            let id = idea.id;
            joins.push(tokio::spawn(async move {
                store.merge_draft(id, step(n), json!({ "step": n })).await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        let profile = store.fetch_idea(idea.id, owner).await.unwrap().ai_profile;
        assert_eq!(profile.len(), 6);
        for n in 1..=6u8 {
            assert_eq!(profile.get(step(n)), Some(&json!({ "step": n })));
        }
    }
}
