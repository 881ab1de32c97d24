//! Step output validator
//!
//! Compiles one schema per generative step at startup and validates gateway
//! output against it. Strict mode rejects; soft mode logs the violations
//! and keeps the normalized output anyway (availability over correctness,
//! reserved for steps prone to truncation). The mode comes from the static
//! step policy, never from call sites.

use crate::error::ValidationError;
use crate::schemas;
use ideaflow_topology::{generative_steps, StepNumber, ValidationMode};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::HashMap;

/// Aggregation outputs validated through the same registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    /// Cross-step validation report
    Report,
    /// Final go/pivot/kill verdict
    Verdict,
}

impl AggregateKind {
    fn name(&self) -> &'static str {
        match self {
            AggregateKind::Report => "report",
            AggregateKind::Verdict => "verdict",
        }
    }
}

/// Compiled per-step schema registry
pub struct SchemaRegistry {
    steps: HashMap<StepNumber, JSONSchema>,
    report: JSONSchema,
    verdict: JSONSchema,
}

impl SchemaRegistry {
    /// Registry over the built-in schemas
    ///
    /// # Errors
    /// [`ValidationError::MissingSchema`] or [`ValidationError::Compile`];
    /// both are startup defects, not runtime conditions.
    pub fn with_defaults() -> Result<Self, ValidationError> {
        Self::from_schemas(schemas::default_schemas())
    }

    /// Registry over caller-provided schemas; every generative step must be
    /// covered
    pub fn from_schemas(raw: HashMap<StepNumber, Value>) -> Result<Self, ValidationError> {
        let mut steps = HashMap::with_capacity(raw.len());
        for step in generative_steps() {
            let schema = raw
                .get(&step)
                .ok_or(ValidationError::MissingSchema(step))?;
            steps.insert(step, compile(schema, &format!("step {step}"))?);
        }
        Ok(Self {
            steps,
            report: compile(&schemas::report_schema(), "report")?,
            verdict: compile(&schemas::verdict_schema(), "verdict")?,
        })
    }

    /// Validate a generated draft for `step` under `mode`.
    ///
    /// Soft mode never fails on schema violations; it logs them and returns
    /// the value unchanged.
    pub fn validate(
        &self,
        step: StepNumber,
        value: Value,
        mode: ValidationMode,
    ) -> Result<Value, ValidationError> {
        let Some(schema) = self.steps.get(&step) else {
            return Err(ValidationError::MissingSchema(step));
        };
        let violations = collect_violations(schema, &value);
        if violations.is_empty() {
            return Ok(value);
        }
        match mode {
            ValidationMode::Strict => Err(ValidationError::Schema { step, violations }),
            ValidationMode::Soft => {
                tracing::warn!(
                    %step,
                    violation_count = violations.len(),
                    first = %violations[0],
                    "accepting schema-violating draft in soft mode"
                );
                Ok(value)
            }
        }
    }

    /// Validate an aggregation output (always strict)
    pub fn validate_aggregate(
        &self,
        kind: AggregateKind,
        value: Value,
    ) -> Result<Value, ValidationError> {
        let schema = match kind {
            AggregateKind::Report => &self.report,
            AggregateKind::Verdict => &self.verdict,
        };
        let violations = collect_violations(schema, &value);
        if violations.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::Aggregate {
                kind: kind.name(),
                violations,
            })
        }
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut steps: Vec<u8> = self.steps.keys().map(|s| s.get()).collect();
        steps.sort_unstable();
        f.debug_struct("SchemaRegistry").field("steps", &steps).finish()
    }
}

fn compile(schema: &Value, target: &str) -> Result<JSONSchema, ValidationError> {
    JSONSchema::compile(schema).map_err(|e| ValidationError::Compile {
        target: target.to_string(),
        message: e.to_string(),
    })
}

fn collect_violations(schema: &JSONSchema, value: &Value) -> Vec<String> {
    match schema.validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    }
}
