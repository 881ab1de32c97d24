//! Error types for the workflow core
//!
//! Two layers: [`DraftError`] is the narrow failure surface of the draft
//! pipeline (quota, store, explicit generation), and [`CoreError`] is the
//! taxonomy user-facing operations report. Generic generation failures
//! never appear in [`DraftError`] for automatic drafts; the pipeline logs
//! them and reports "no draft produced" instead.

use ideaflow_topology::{InvalidStep, StepNumber};

/// A failure of the draft generation pipeline
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// The backend signaled resource exhaustion; callers present a
    /// retry-after hint instead of a hard failure
    #[error("model quota exhausted, retry after {retry_after_secs}s")]
    Quota {
        /// Suggested delay before retrying
        retry_after_secs: u64,
    },

    /// The idea or its inputs could not be read, or the draft could not
    /// be saved
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    /// A user-initiated aggregate generation failed outright
    #[error("generation failed: {0}")]
    Generation(String),
}

/// Error taxonomy of the user-facing core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Requested step number outside the topology; rejected before any I/O
    #[error(transparent)]
    InvalidStep(#[from] InvalidStep),

    /// Idea or step input missing, or not owned by the requester
    #[error("not found: {0}")]
    NotFound(String),

    /// Confirming a step other than the one under the pointer
    #[error("step {step} is not the current step (pointer at {current_step})")]
    StepNotCurrent {
        /// Step the caller tried to confirm
        step: StepNumber,
        /// Where the pointer actually is
        current_step: u8,
    },

    /// The generative backend's quota was hit; retryable
    #[error("model quota exhausted, retry after {retry_after_secs}s")]
    QuotaExceeded {
        /// Suggested delay before retrying
        retry_after_secs: u64,
    },

    /// An explicit, user-initiated generation failed
    #[error("generation failed: {0}")]
    Generation(String),

    /// Store failure surfaced by the operation that caused it
    #[error("store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Whether the caller should retry after a delay
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Suggested retry delay in seconds, if any
    #[inline]
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::QuotaExceeded { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl From<crate::store::StoreError> for CoreError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(what) => Self::NotFound(what),
            crate::store::StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

impl From<DraftError> for CoreError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::Quota { retry_after_secs } => Self::QuotaExceeded { retry_after_secs },
            DraftError::Store(store) => store.into(),
            DraftError::Generation(msg) => Self::Generation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn quota_is_the_only_retryable_kind() {
        let quota = CoreError::QuotaExceeded { retry_after_secs: 30 };
        assert!(quota.is_retryable());
        assert_eq!(quota.retry_after(), Some(30));

        assert!(!CoreError::NotFound("idea".to_string()).is_retryable());
        assert!(!CoreError::Generation("parse".to_string()).is_retryable());
        assert!(!CoreError::Store("io".to_string()).is_retryable());
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: CoreError = StoreError::NotFound("idea abc".to_string()).into();
        assert!(matches!(err, CoreError::NotFound(_)));

        let err: CoreError = StoreError::Backend("disk full".to_string()).into();
        assert!(matches!(err, CoreError::Store(_)));
    }

    #[test]
    fn draft_quota_propagates_distinctly() {
        let err: CoreError = DraftError::Quota { retry_after_secs: 12 }.into();
        assert_eq!(err.retry_after(), Some(12));
    }

    #[test]
    fn invalid_step_converts_from_topology() {
        let invalid = ideaflow_topology::StepNumber::new(99).unwrap_err();
        let err: CoreError = invalid.into();
        assert!(matches!(err, CoreError::InvalidStep(_)));
    }
}
