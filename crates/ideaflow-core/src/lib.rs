//! Ideaflow Core - the idea-validation workflow engine
//!
//! Orchestrates one user's run through the 14-step workflow:
//! - The [`Idea`] aggregate with its monotone step pointer and sparse
//!   per-step AI profile
//! - The [`IdeaStore`] persistence seam and an in-memory reference store
//! - The context assembler that renders prior steps into one prompt
//! - The [`DraftPipeline`]: assemble → invoke → validate → merge
//! - The [`SubmissionOrchestrator`]: submit, confirm, fetch, regenerate,
//!   report and verdict, with fire-and-forget draft prefetch
//!
//! # Example
//!
//! ```rust,ignore
//! use ideaflow_core::{DraftPipeline, InMemoryIdeaStore, OwnerId, SubmissionOrchestrator};
//! use ideaflow_gateway::{ModelGateway, SchemaRegistry};
//! use ideaflow_topology::StepNumber;
//! use std::sync::Arc;
//!
//! # async fn example(backend: impl ideaflow_gateway::GenerativeBackend) -> Result<(), ideaflow_core::CoreError> {
//! let store = Arc::new(InMemoryIdeaStore::new());
//! let pipeline = Arc::new(DraftPipeline::new(
//!     ModelGateway::new(backend),
//!     SchemaRegistry::with_defaults().expect("built-in schemas compile"),
//!     Arc::clone(&store),
//! ));
//! let orchestrator = SubmissionOrchestrator::new(store, pipeline);
//!
//! let owner = OwnerId::new();
//! let idea = orchestrator.start_idea(owner, "rent out idle 3D printers".into()).await?;
//! let ack = orchestrator
//!     .submit(idea.id, owner, StepNumber::FIRST, serde_json::json!({ "problem": "…" }))
//!     .await?;
//! assert_eq!(ack.draft_queued.map(|s| s.get()), Some(2));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod context;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod store;
pub mod submit;
pub mod types;

// Re-exports for convenience
pub use context::{assemble, assemble_all, AssembledContext, ContextEntry, SYSTEM_CONTEXT};
pub use error::{CoreError, DraftError};
pub use memory::InMemoryIdeaStore;
pub use pipeline::DraftPipeline;
pub use store::{IdeaStore, StoreError};
pub use submit::{SubmissionOrchestrator, DRAFT_QUEUE_DEPTH};
pub use types::{AiProfile, Idea, IdeaId, OwnerId, StepInput, StepView, SubmissionAck};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the workflow core
    pub use crate::{
        CoreError, DraftPipeline, Idea, IdeaId, IdeaStore, InMemoryIdeaStore, OwnerId,
        StepView, SubmissionAck, SubmissionOrchestrator,
    };
    pub use ideaflow_topology::{IdeaStatus, StepNumber, StepStatus};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
