//! Ideaflow Topology - static workflow shape and progression rules
//!
//! Declares, once, the 14-step / 4-phase topology of the guided
//! idea-validation workflow and everything that can be derived from it
//! without touching stored state:
//! - The step/phase table and its lookups
//! - The per-step generation policy (excluded steps, validation mode,
//!   output-size and timeout budgets)
//! - The pure progression/unlock engine
//!
//! # Example
//!
//! ```rust
//! use ideaflow_topology::{step_status, IdeaStatus, StepNumber, StepStatus};
//!
//! let step = StepNumber::new(10)?;
//! // Pointer at 8: the sequential phase is done, later phases fan out.
//! assert_eq!(step_status(step, 8, IdeaStatus::Active), StepStatus::Available);
//! # Ok::<(), ideaflow_topology::InvalidStep>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod phase;
pub mod policy;
pub mod progression;
pub mod step;

// Re-exports for convenience
pub use phase::Phase;
pub use policy::{generative_steps, policy_for, GenerationPolicy, ValidationMode};
pub use progression::{
    completed_steps, is_workflow_complete, step_status, IdeaStatus, StepStatus,
    COMPLETION_POINTER,
};
pub use step::{
    all_step_numbers, entry, fan_out_gate, max_step, phase_of, steps_in_phase, InvalidStep,
    StepNumber, TopologyEntry, STEP_COUNT, TOPOLOGY,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
