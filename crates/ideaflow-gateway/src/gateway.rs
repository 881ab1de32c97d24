//! Model invocation gateway
//!
//! Wraps a single call to the generative backend: bounded by the step's
//! timeout budget, parsed into structured data, sanitized, and with every
//! failure classified as either quota exhaustion or generic. The gateway
//! never retries and never hides a generic failure.

use crate::backend::{BackendError, GenerationOptions, GenerationRequest, GenerativeBackend};
use crate::error::GatewayError;
use crate::sanitize::strip_markup;
use serde_json::Value;

/// Retry delay suggested when the backend signals quota exhaustion without
/// its own hint
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// One-shot gateway to the generative backend
#[derive(Debug)]
pub struct ModelGateway<B> {
    backend: B,
}

impl<B: GenerativeBackend> ModelGateway<B> {
    /// New gateway over a backend
    #[inline]
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run exactly one generation call and normalize its result.
    ///
    /// # Errors
    /// - [`GatewayError::Quota`] when the backend signals resource
    ///   exhaustion; carries a retry-after hint.
    /// - [`GatewayError::Generic`] for timeouts, transport failures and
    ///   non-parseable output. Never defaulted, always surfaced.
    pub async fn invoke(
        &self,
        system: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Value, GatewayError> {
        let request = GenerationRequest {
            system: system.to_string(),
            prompt: prompt.to_string(),
            options: options.clone(),
        };

        tracing::debug!(
            model = %request.options.model,
            max_output_tokens = request.options.max_output_tokens,
            prompt_bytes = request.prompt.len(),
            "invoking generative backend"
        );

        let raw = tokio::time::timeout(options.timeout, self.backend.generate(&request))
            .await
            .map_err(|_| {
                GatewayError::Generic(format!(
                    "model call timed out after {}s",
                    options.timeout.as_secs()
                ))
            })?
            .map_err(classify)?;

        let body = strip_code_fence(&raw);
        let value: Value = serde_json::from_str(body).map_err(|e| {
            GatewayError::Generic(format!("model returned non-parseable output: {e}"))
        })?;

        Ok(strip_markup(value))
    }
}

/// Map a backend error onto the two-kind taxonomy
fn classify(err: BackendError) -> GatewayError {
    if err.is_quota() {
        GatewayError::Quota {
            retry_after_secs: err.retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }
    } else {
        GatewayError::Generic(err.to_string())
    }
}

/// Tolerate one Markdown code-fence wrapper around the JSON body
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    struct FixedBackend(Result<String, BackendError>);

    #[async_trait]
    impl GenerativeBackend for FixedBackend {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
            self.0.clone()
        }
    }

    struct StallingBackend;

    #[async_trait]
    impl GenerativeBackend for StallingBackend {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn parses_and_sanitizes_structured_output() {
        let gateway = ModelGateway::new(FixedBackend(Ok(
            r#"{"headline": "**Bold** claim", "benefits": ["*fast*"]}"#.to_string(),
        )));
        let value = gateway
            .invoke("system", "prompt", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(value, json!({ "headline": "Bold claim", "benefits": ["fast"] }));
    }

    #[tokio::test]
    async fn tolerates_a_code_fence_wrapper() {
        let gateway = ModelGateway::new(FixedBackend(Ok(
            "```json\n{\"ok\": true}\n```".to_string(),
        )));
        let value = gateway
            .invoke("system", "prompt", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn non_parseable_output_is_a_generic_failure() {
        let gateway = ModelGateway::new(FixedBackend(Ok("sorry, I cannot do that".to_string())));
        let err = gateway
            .invoke("system", "prompt", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Generic(_)));
        assert!(err.to_string().contains("non-parseable"));
    }

    #[tokio::test]
    async fn quota_errors_are_classified_with_retry_hint() {
        let gateway = ModelGateway::new(FixedBackend(Err(BackendError::new(
            "You exceeded your current quota",
        )
        .with_status(429)
        .with_retry_after(17))));
        let err = gateway
            .invoke("system", "prompt", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(17));
    }

    #[tokio::test]
    async fn quota_without_server_hint_uses_default_delay() {
        let gateway = ModelGateway::new(FixedBackend(Err(
            BackendError::new("rate limit exceeded"),
        )));
        let err = gateway
            .invoke("system", "prompt", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(DEFAULT_RETRY_AFTER_SECS));
    }

    #[tokio::test]
    async fn timeout_is_a_generic_failure() {
        let gateway = ModelGateway::new(StallingBackend);
        let options = GenerationOptions {
            timeout: Duration::from_millis(10),
            ..GenerationOptions::default()
        };
        let err = gateway.invoke("system", "prompt", &options).await.unwrap_err();
        assert!(matches!(err, GatewayError::Generic(_)));
        assert!(!err.is_quota());
    }

    #[test]
    fn code_fence_stripping_is_conservative() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        // An unterminated fence is left for the JSON parser to reject.
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }
}
