//! Progression/unlock engine
//!
//! A pure function over `(step, current-step pointer, idea status)` and the
//! static topology. No I/O, no clock, no allocation: it cannot fail, which
//! is what makes it trivially unit-testable.

use crate::phase::Phase;
use crate::step::{fan_out_gate, StepNumber, STEP_COUNT};
use serde::{Deserialize, Serialize};

/// Pointer value meaning the whole workflow has been walked
pub const COMPLETION_POINTER: u8 = STEP_COUNT + 1;

/// Overall lifecycle status of an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    /// The user is still working through the steps
    Active,
    /// The workflow has been concluded
    Completed,
}

/// Unlock state of a single step, as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The user has moved past this step
    Completed,
    /// The step the pointer currently rests on
    Current,
    /// Reachable but not yet worked on
    Available,
    /// Not reachable yet
    Locked,
}

/// Unlock state of `step` for an idea whose pointer is at `current_step`.
///
/// `current_step` ranges over `1..=15`; [`COMPLETION_POINTER`] (15) means
/// every step has been walked.
///
/// Policy:
/// 1. A step already passed by the pointer is `Completed`; so is any
///    fan-out-phase step of an idea whose overall status is `Completed`.
/// 2. The step under the pointer is `Current`.
/// 3. A fan-out-phase step is `Available` once the pointer has moved past
///    the sequential phase's last step.
/// 4. Everything else is `Locked`.
#[must_use]
pub fn step_status(step: StepNumber, current_step: u8, idea_status: IdeaStatus) -> StepStatus {
    let fan_out = step.phase().is_fan_out();

    if step.get() < current_step || (idea_status == IdeaStatus::Completed && fan_out) {
        return StepStatus::Completed;
    }
    if step.get() == current_step {
        return StepStatus::Current;
    }
    if fan_out && current_step > fan_out_gate().get() {
        return StepStatus::Available;
    }
    StepStatus::Locked
}

/// Whether a pointer value means the workflow has been fully walked
#[inline]
#[must_use]
pub fn is_workflow_complete(current_step: u8) -> bool {
    current_step >= COMPLETION_POINTER
}

/// Steps the pointer has already passed, in ascending order
#[must_use]
pub fn completed_steps(current_step: u8, idea_status: IdeaStatus) -> Vec<StepNumber> {
    crate::step::all_step_numbers()
        .into_iter()
        .filter(|s| step_status(*s, current_step, idea_status) == StepStatus::Completed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: u8) -> StepNumber {
        StepNumber::new(n).unwrap()
    }

    #[test]
    fn sequential_phase_unlocks_one_step_at_a_time() {
        // Pointer at 3: steps 1-2 done, 3 current, 4+ locked.
        assert_eq!(step_status(step(1), 3, IdeaStatus::Active), StepStatus::Completed);
        assert_eq!(step_status(step(2), 3, IdeaStatus::Active), StepStatus::Completed);
        assert_eq!(step_status(step(3), 3, IdeaStatus::Active), StepStatus::Current);
        assert_eq!(step_status(step(4), 3, IdeaStatus::Active), StepStatus::Locked);
        assert_eq!(step_status(step(10), 3, IdeaStatus::Active), StepStatus::Locked);
    }

    #[test]
    fn pointer_exactly_at_the_gate_keeps_later_phases_locked() {
        // Step 7 is the last sequential step; later phases need pointer > 7.
        assert_eq!(step_status(step(7), 7, IdeaStatus::Active), StepStatus::Current);
        assert_eq!(step_status(step(8), 7, IdeaStatus::Active), StepStatus::Locked);
        assert_eq!(step_status(step(14), 7, IdeaStatus::Active), StepStatus::Locked);
    }

    #[test]
    fn later_phases_fan_out_past_the_gate() {
        assert_eq!(step_status(step(3), 8, IdeaStatus::Active), StepStatus::Completed);
        assert_eq!(step_status(step(7), 8, IdeaStatus::Active), StepStatus::Completed);
        assert_eq!(step_status(step(8), 8, IdeaStatus::Active), StepStatus::Current);
        assert_eq!(step_status(step(10), 8, IdeaStatus::Active), StepStatus::Available);
        assert_eq!(step_status(step(13), 8, IdeaStatus::Active), StepStatus::Available);
    }

    #[test]
    fn completed_idea_reports_fan_out_steps_completed_even_mid_sequence() {
        // Concluded while the pointer was still at 4: later phases read
        // Completed, not Available; untouched sequential steps stay put.
        assert_eq!(step_status(step(10), 4, IdeaStatus::Completed), StepStatus::Completed);
        assert_eq!(step_status(step(14), 4, IdeaStatus::Completed), StepStatus::Completed);
        assert_eq!(step_status(step(4), 4, IdeaStatus::Completed), StepStatus::Current);
        assert_eq!(step_status(step(5), 4, IdeaStatus::Completed), StepStatus::Locked);
    }

    #[test]
    fn completion_pointer_marks_everything_completed() {
        assert!(is_workflow_complete(COMPLETION_POINTER));
        assert!(!is_workflow_complete(14));
        for n in 1..=STEP_COUNT {
            assert_eq!(
                step_status(step(n), COMPLETION_POINTER, IdeaStatus::Completed),
                StepStatus::Completed
            );
        }
    }

    #[test]
    fn completed_steps_are_a_prefix_of_the_sequential_phase() {
        let done = completed_steps(5, IdeaStatus::Active);
        let raw: Vec<u8> = done.iter().map(|s| s.get()).collect();
        assert_eq!(raw, vec![1, 2, 3, 4]);
    }
}
