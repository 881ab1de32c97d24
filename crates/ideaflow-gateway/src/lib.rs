//! Ideaflow Gateway - model invocation and output validation
//!
//! Everything between the workflow core and the external generative
//! service:
//! - The [`GenerativeBackend`] seam and per-call [`GenerationOptions`]
//! - [`ModelGateway`]: one bounded call, structured-output parsing,
//!   recursive markup stripping, quota-vs-generic failure classification
//! - [`SchemaRegistry`]: compiled per-step schemas with strict and soft
//!   validation modes
//!
//! # Example
//!
//! ```rust,ignore
//! use ideaflow_gateway::{GenerationOptions, ModelGateway, SchemaRegistry};
//! use ideaflow_topology::{policy_for, StepNumber};
//!
//! # async fn example(backend: impl ideaflow_gateway::GenerativeBackend) -> anyhow::Result<()> {
//! let gateway = ModelGateway::new(backend);
//! let registry = SchemaRegistry::with_defaults()?;
//!
//! let step = StepNumber::new(5)?;
//! let policy = policy_for(step);
//! let raw = gateway
//!     .invoke("You are a startup coach.", "…", &GenerationOptions::for_policy(policy))
//!     .await?;
//! let draft = registry.validate(step, raw, policy.validation)?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod error;
pub mod gateway;
pub mod sanitize;
pub mod schemas;
pub mod validator;

// Re-exports for convenience
pub use backend::{
    BackendError, GenerationOptions, GenerationRequest, GenerativeBackend, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
pub use error::{GatewayError, ValidationError};
pub use gateway::{ModelGateway, DEFAULT_RETRY_AFTER_SECS};
pub use sanitize::strip_markup;
pub use validator::{AggregateKind, SchemaRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
