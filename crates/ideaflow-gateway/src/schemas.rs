//! Built-in per-step output schemas
//!
//! One JSON Schema per generative step, describing the structured draft the
//! model must produce for that step's form. Embedders can override any of
//! these before the registry compiles them; the shapes here are the
//! contract the built-in prompts are written against.

use ideaflow_topology::StepNumber;
use serde_json::{json, Value};
use std::collections::HashMap;

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "minItems": 1 })
}

/// Default schema for one generative step, `None` for excluded steps
#[must_use]
pub fn schema_for(step: StepNumber) -> Option<Value> {
    let schema = match step.get() {
        1 => json!({
            "type": "object",
            "required": ["problem_statement", "who_is_affected", "pain_points"],
            "properties": {
                "problem_statement": { "type": "string" },
                "who_is_affected": { "type": "string" },
                "pain_points": string_array(),
            }
        }),
        2 => json!({
            "type": "object",
            "required": ["segments", "early_adopters"],
            "properties": {
                "segments": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["name", "description"],
                        "properties": {
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                        }
                    }
                },
                "early_adopters": { "type": "string" },
            }
        }),
        3 => json!({
            "type": "object",
            "required": ["market_size", "trends", "opportunities"],
            "properties": {
                "market_size": { "type": "string" },
                "trends": string_array(),
                "opportunities": string_array(),
            }
        }),
        4 => json!({
            "type": "object",
            "required": ["competitors", "differentiation"],
            "properties": {
                "competitors": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name", "strengths", "weaknesses"],
                        "properties": {
                            "name": { "type": "string" },
                            "strengths": string_array(),
                            "weaknesses": string_array(),
                        }
                    }
                },
                "differentiation": { "type": "string" },
            }
        }),
        5 => json!({
            "type": "object",
            "required": ["headline", "benefits"],
            "properties": {
                "headline": { "type": "string" },
                "benefits": string_array(),
                "proof_points": string_array(),
            }
        }),
        6 => json!({
            "type": "object",
            "required": ["concept", "key_features"],
            "properties": {
                "concept": { "type": "string" },
                "key_features": string_array(),
                "open_risks": string_array(),
            }
        }),
        8 => json!({
            "type": "object",
            "required": ["script", "target_profiles", "success_criteria"],
            "properties": {
                "script": string_array(),
                "target_profiles": string_array(),
                "success_criteria": { "type": "string" },
            }
        }),
        9 => json!({
            "type": "object",
            "required": ["channel", "hypothesis", "metrics"],
            "properties": {
                "channel": { "type": "string" },
                "hypothesis": { "type": "string" },
                "metrics": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["name", "target"],
                        "properties": {
                            "name": { "type": "string" },
                            "target": { "type": "string" },
                        }
                    }
                },
            }
        }),
        // The business-model canvas is the largest output in the workflow;
        // its policy validates softly because truncation is common here.
        10 => json!({
            "type": "object",
            "required": [
                "customer_segments", "value_propositions", "channels",
                "customer_relationships", "revenue_streams", "key_resources",
                "key_activities", "key_partners", "cost_structure"
            ],
            "properties": {
                "customer_segments": string_array(),
                "value_propositions": string_array(),
                "channels": string_array(),
                "customer_relationships": string_array(),
                "revenue_streams": string_array(),
                "key_resources": string_array(),
                "key_activities": string_array(),
                "key_partners": string_array(),
                "cost_structure": string_array(),
            }
        }),
        11 => json!({
            "type": "object",
            "required": ["model", "tiers", "rationale"],
            "properties": {
                "model": { "type": "string" },
                "tiers": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["name", "price", "includes"],
                        "properties": {
                            "name": { "type": "string" },
                            "price": { "type": "string" },
                            "includes": string_array(),
                        }
                    }
                },
                "rationale": { "type": "string" },
            }
        }),
        12 => json!({
            "type": "object",
            "required": ["positioning", "channels", "first_90_days"],
            "properties": {
                "positioning": { "type": "string" },
                "channels": string_array(),
                "first_90_days": string_array(),
            }
        }),
        13 => json!({
            "type": "object",
            "required": ["milestones", "launch_checklist"],
            "properties": {
                "milestones": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["name", "due"],
                        "properties": {
                            "name": { "type": "string" },
                            "due": { "type": "string" },
                        }
                    }
                },
                "launch_checklist": string_array(),
                "announcement": { "type": "string" },
            }
        }),
        _ => return None,
    };
    Some(schema)
}

/// Default schemas for every generative step
#[must_use]
pub fn default_schemas() -> HashMap<StepNumber, Value> {
    ideaflow_topology::generative_steps()
        .into_iter()
        .filter_map(|step| schema_for(step).map(|s| (step, s)))
        .collect()
}

/// Schema for the cross-step validation report
#[must_use]
pub fn report_schema() -> Value {
    json!({
        "type": "object",
        "required": ["summary", "strengths", "weaknesses", "recommendations"],
        "properties": {
            "summary": { "type": "string" },
            "strengths": string_array(),
            "weaknesses": string_array(),
            "recommendations": string_array(),
        }
    })
}

/// Schema for the final go/pivot/kill verdict
#[must_use]
pub fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "required": ["decision", "confidence", "reasoning"],
        "properties": {
            "decision": { "type": "string", "enum": ["go", "pivot", "kill"] },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
            "reasoning": { "type": "string" },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_generative_step_has_a_schema() {
        let schemas = default_schemas();
        for step in ideaflow_topology::generative_steps() {
            assert!(schemas.contains_key(&step), "step {step} missing a schema");
        }
        assert_eq!(schemas.len(), 12);
    }

    #[test]
    fn excluded_steps_have_no_schema() {
        assert!(schema_for(StepNumber::new(7).unwrap()).is_none());
        assert!(schema_for(StepNumber::new(14).unwrap()).is_none());
    }
}
