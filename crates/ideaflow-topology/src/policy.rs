//! Per-step generation policy
//!
//! One static entry per step: whether a draft is generated automatically,
//! how strictly its output is validated, and the output-size/time budget
//! for the model call. Keeping the policy in one table (rather than as
//! flags threaded through call sites) keeps it authoritative and testable
//! in isolation.

use crate::step::{StepNumber, STEP_COUNT};
use serde::{Deserialize, Serialize};

/// Default output budget for a draft, in tokens
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;
/// Output budget for large-output steps
pub const LARGE_MAX_OUTPUT_TOKENS: u32 = 8192;
/// Default model-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Model-call timeout for large-output steps
pub const LARGE_TIMEOUT_SECS: u64 = 90;

/// How a step's generated output is validated against its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Schema violation is fatal to the generation attempt
    Strict,
    /// Schema violation is logged but the normalized output is kept.
    /// Used for steps whose output runs close to model size limits,
    /// where something imperfect beats nothing.
    Soft,
}

/// Generation policy for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Whether a draft is generated automatically for this step.
    /// Synthesis/report steps are driven by explicit user action instead.
    pub generates: bool,
    /// Validation mode for the generated output
    pub validation: ValidationMode,
    /// Maximum model output size, in tokens
    pub max_output_tokens: u32,
    /// Timeout for the model call, in seconds
    pub timeout_secs: u64,
}

impl GenerationPolicy {
    const fn strict() -> Self {
        Self {
            generates: true,
            validation: ValidationMode::Strict,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    const fn soft_large() -> Self {
        Self {
            generates: true,
            validation: ValidationMode::Soft,
            max_output_tokens: LARGE_MAX_OUTPUT_TOKENS,
            timeout_secs: LARGE_TIMEOUT_SECS,
        }
    }

    const fn excluded() -> Self {
        Self {
            generates: false,
            validation: ValidationMode::Strict,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Policy table indexed by step number.
///
/// Steps 7 (discovery synthesis) and 14 (final verdict) are excluded from
/// automatic generation. Step 10 (business model) produces the largest
/// structured output and validates softly.
const POLICIES: [GenerationPolicy; STEP_COUNT as usize] = [
    GenerationPolicy::strict(),     // 1 problem definition
    GenerationPolicy::strict(),     // 2 target audience
    GenerationPolicy::strict(),     // 3 market landscape
    GenerationPolicy::strict(),     // 4 competitor scan
    GenerationPolicy::strict(),     // 5 value proposition
    GenerationPolicy::strict(),     // 6 solution sketch
    GenerationPolicy::excluded(),   // 7 discovery synthesis
    GenerationPolicy::strict(),     // 8 customer interviews
    GenerationPolicy::strict(),     // 9 demand test
    GenerationPolicy::soft_large(), // 10 business model
    GenerationPolicy::strict(),     // 11 pricing
    GenerationPolicy::strict(),     // 12 go-to-market
    GenerationPolicy::strict(),     // 13 launch plan
    GenerationPolicy::excluded(),   // 14 final verdict
];

/// Generation policy for a step
#[inline]
#[must_use]
pub fn policy_for(step: StepNumber) -> &'static GenerationPolicy {
    &POLICIES[(step.get() - 1) as usize]
}

/// Steps that generate drafts automatically, in ascending order
#[must_use]
pub fn generative_steps() -> Vec<StepNumber> {
    crate::step::all_step_numbers()
        .into_iter()
        .filter(|s| policy_for(*s).generates)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_steps_are_excluded() {
        assert!(!policy_for(StepNumber::new(7).unwrap()).generates);
        assert!(!policy_for(StepNumber::new(14).unwrap()).generates);
        assert_eq!(generative_steps().len(), 12);
    }

    #[test]
    fn business_model_step_is_soft_with_large_budget() {
        let policy = policy_for(StepNumber::new(10).unwrap());
        assert_eq!(policy.validation, ValidationMode::Soft);
        assert_eq!(policy.max_output_tokens, LARGE_MAX_OUTPUT_TOKENS);
        assert!(policy.timeout_secs > DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn default_steps_are_strict() {
        let policy = policy_for(StepNumber::new(2).unwrap());
        assert!(policy.generates);
        assert_eq!(policy.validation, ValidationMode::Strict);
        assert_eq!(policy.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    }
}
