//! Context assembler
//!
//! For a target step N, gathers the user inputs and prior drafts of every
//! step strictly before N and renders them, together with the idea's seed
//! description, into the prompt for one gateway call. Read-only over the
//! store; entries come back in ascending step order and rendering is
//! deterministic, so unchanged upstream data yields byte-identical prompts.

use crate::store::{IdeaStore, StoreError};
use crate::types::Idea;
use ideaflow_topology::{all_step_numbers, StepNumber};
use serde_json::Value;

/// System instruction sent with every workflow generation call
pub const SYSTEM_CONTEXT: &str = "You are a startup validation coach. Using the idea \
description and the work completed in earlier steps, produce the requested draft as a \
single JSON object matching the requested shape. Respond with JSON only.";

/// Cross-step data for one prior step
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    /// The prior step
    pub step: StepNumber,
    /// User-submitted answers, if any
    pub user_input: Option<Value>,
    /// Stored draft, if any
    pub ai_output: Option<Value>,
}

/// A rendered gateway request for one target
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// Prior-step data, ascending by step; steps with no data are omitted
    pub entries: Vec<ContextEntry>,
    /// System instruction
    pub system: String,
    /// Rendered prompt
    pub prompt: String,
}

/// Assemble the context for generating `target`'s draft.
///
/// Only steps strictly before `target` contribute; steps without stored
/// input or draft are omitted, not zero-filled.
pub async fn assemble<S: IdeaStore + ?Sized>(
    store: &S,
    idea: &Idea,
    target: StepNumber,
) -> Result<AssembledContext, StoreError> {
    let entries = collect_entries(store, idea, Some(target)).await?;
    let prompt = render(idea, &entries, Some(target));
    Ok(AssembledContext {
        entries,
        system: SYSTEM_CONTEXT.to_string(),
        prompt,
    })
}

/// Assemble the full cross-step context for report/verdict generation
pub async fn assemble_all<S: IdeaStore + ?Sized>(
    store: &S,
    idea: &Idea,
) -> Result<AssembledContext, StoreError> {
    let entries = collect_entries(store, idea, None).await?;
    let prompt = render(idea, &entries, None);
    Ok(AssembledContext {
        entries,
        system: SYSTEM_CONTEXT.to_string(),
        prompt,
    })
}

async fn collect_entries<S: IdeaStore + ?Sized>(
    store: &S,
    idea: &Idea,
    before: Option<StepNumber>,
) -> Result<Vec<ContextEntry>, StoreError> {
    let inputs = store.step_inputs(idea.id).await?;
    let mut entries = Vec::new();
    for step in all_step_numbers() {
        if let Some(target) = before {
            if step >= target {
                break;
            }
        }
        let user_input = inputs
            .iter()
            .find(|i| i.step == step)
            .map(|i| i.content.clone());
        let ai_output = idea.ai_profile.get(step).cloned();
        if user_input.is_some() || ai_output.is_some() {
            entries.push(ContextEntry {
                step,
                user_input,
                ai_output,
            });
        }
    }
    Ok(entries)
}

fn render(idea: &Idea, entries: &[ContextEntry], target: Option<StepNumber>) -> String {
    let mut prompt = format!("Idea: {}\n", idea.seed);

    for entry in entries {
        let topo = entry.step.entry();
        prompt.push_str(&format!("\n## Step {}: {}\n", entry.step, topo.name));
        if let Some(input) = &entry.user_input {
            prompt.push_str("User input:\n");
            prompt.push_str(&compact(input));
            prompt.push('\n');
        }
        if let Some(output) = &entry.ai_output {
            prompt.push_str("Prior draft:\n");
            prompt.push_str(&compact(output));
            prompt.push('\n');
        }
    }

    match target {
        Some(step) => {
            let topo = step.entry();
            prompt.push_str(&format!(
                "\nProduce the draft for step {}: {}.\n",
                step, topo.name
            ));
        }
        None => {
            prompt.push_str(
                "\nProduce the requested assessment of the idea based on all steps above.\n",
            );
        }
    }
    prompt
}

// serde_json's map is ordered, so this is stable across calls.
fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
