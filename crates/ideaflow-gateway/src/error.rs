//! Error types for the gateway crate
//!
//! The gateway classifies every invocation failure into exactly two kinds:
//! quota exhaustion (the caller may retry later) and everything else.
//! Validation failures are a separate type because the caller's policy
//! (strict vs soft) decides whether they are fatal.

use ideaflow_topology::StepNumber;

/// A failed model invocation
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The backend signaled resource exhaustion (quota or rate limit)
    #[error("model quota exhausted, retry after {retry_after_secs}s")]
    Quota {
        /// Suggested delay before retrying
        retry_after_secs: u64,
    },

    /// Any other failure: timeouts, transport errors, non-parseable output
    #[error("generation failed: {0}")]
    Generic(String),
}

impl GatewayError {
    /// Whether this failure is the retryable quota kind
    #[inline]
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::Quota { .. })
    }

    /// Suggested retry delay, if any
    #[inline]
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Quota { retry_after_secs } => Some(*retry_after_secs),
            Self::Generic(_) => None,
        }
    }
}

/// A failed schema validation of generated output
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// No schema registered for a step that generates drafts
    #[error("no schema registered for step {0}")]
    MissingSchema(StepNumber),

    /// A registered schema did not compile
    #[error("schema for {target} failed to compile: {message}")]
    Compile {
        /// Step number or aggregate name the schema belongs to
        target: String,
        /// Compiler message
        message: String,
    },

    /// Generated output violates the step's schema (strict mode)
    #[error("output for step {step} violates its schema ({} violation(s))", violations.len())]
    Schema {
        /// Step whose schema was violated
        step: StepNumber,
        /// Individual violation messages
        violations: Vec<String>,
    },

    /// A report or verdict violates its schema
    #[error("{kind} output violates its schema ({} violation(s))", violations.len())]
    Aggregate {
        /// Which aggregate was being validated ("report" or "verdict")
        kind: &'static str,
        /// Individual violation messages
        violations: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_carries_retry_hint() {
        let err = GatewayError::Quota { retry_after_secs: 42 };
        assert!(err.is_quota());
        assert_eq!(err.retry_after(), Some(42));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn generic_has_no_retry_hint() {
        let err = GatewayError::Generic("boom".to_string());
        assert!(!err.is_quota());
        assert_eq!(err.retry_after(), None);
    }
}
