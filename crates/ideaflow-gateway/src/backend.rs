//! Generative backend seam
//!
//! The gateway talks to the external generative service through the
//! [`GenerativeBackend`] trait: one rendered request in, one raw text
//! response out. Transport, authentication and the concrete provider live
//! behind this trait; tests script it.

use async_trait::async_trait;
use ideaflow_topology::GenerationPolicy;
use std::time::Duration;

/// Default model identifier used when the embedder does not override it
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Default sampling temperature for draft generation
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Options for a single generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Model identifier understood by the backend
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output size, in tokens
    pub max_output_tokens: u32,
    /// Upper bound on the whole call
    pub timeout: Duration,
}

impl GenerationOptions {
    /// Options derived from a step's generation policy
    #[must_use]
    pub fn for_policy(policy: &GenerationPolicy) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: policy.max_output_tokens,
            timeout: Duration::from_secs(policy.timeout_secs),
        }
    }

    /// With a specific model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With a specific temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: ideaflow_topology::policy::DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(ideaflow_topology::policy::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// One fully rendered request to the generative backend
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instruction
    pub system: String,
    /// Rendered user prompt
    pub prompt: String,
    /// Generation options
    pub options: GenerationOptions,
}

/// An error reported by the generative backend
#[derive(Debug, Clone, thiserror::Error)]
#[error("backend error: {message}")]
pub struct BackendError {
    /// Transport-level status code, when the backend exposes one
    pub status: Option<u16>,
    /// Provider error message
    pub message: String,
    /// Server-provided retry-after hint, in seconds
    pub retry_after_secs: Option<u64>,
}

impl BackendError {
    /// New backend error with just a message
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// With a status code
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// With a server-provided retry-after hint
    #[inline]
    #[must_use]
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    /// Whether this error carries quota/rate-limit markers
    #[must_use]
    pub fn is_quota(&self) -> bool {
        if self.status == Some(429) {
            return true;
        }
        let lowered = self.message.to_lowercase();
        const MARKERS: [&str; 5] = [
            "quota",
            "rate limit",
            "rate_limit",
            "resource_exhausted",
            "too many requests",
        ];
        MARKERS.iter().any(|m| lowered.contains(m))
    }
}

/// Seam to the external generative-text service.
///
/// Implementations send exactly one request and never retry; retry policy
/// belongs to callers, which need the quota/generic distinction to decide.
#[async_trait]
pub trait GenerativeBackend: Send + Sync + 'static {
    /// Run one generation call and return the raw response text
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_detected_by_status_code() {
        assert!(BackendError::new("anything").with_status(429).is_quota());
        assert!(!BackendError::new("anything").with_status(500).is_quota());
    }

    #[test]
    fn quota_detected_by_message_markers() {
        assert!(BackendError::new("You exceeded your current quota").is_quota());
        assert!(BackendError::new("RESOURCE_EXHAUSTED: slow down").is_quota());
        assert!(BackendError::new("Rate limit reached for requests").is_quota());
        assert!(!BackendError::new("internal server error").is_quota());
    }

    #[test]
    fn options_follow_the_step_policy() {
        let policy = ideaflow_topology::policy_for(ideaflow_topology::StepNumber::new(10).unwrap());
        let options = GenerationOptions::for_policy(policy);
        assert_eq!(options.max_output_tokens, policy.max_output_tokens);
        assert_eq!(options.timeout, Duration::from_secs(policy.timeout_secs));
    }
}
