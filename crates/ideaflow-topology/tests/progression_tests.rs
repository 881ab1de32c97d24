use ideaflow_topology::{
    all_step_numbers, fan_out_gate, step_status, IdeaStatus, Phase, StepNumber, StepStatus,
    COMPLETION_POINTER, STEP_COUNT,
};
use proptest::prelude::*;

#[test]
fn scenario_fresh_idea() {
    let status = IdeaStatus::Active;
    assert_eq!(step_status(StepNumber::FIRST, 1, status), StepStatus::Current);
    for step in all_step_numbers().into_iter().skip(1) {
        assert_eq!(step_status(step, 1, status), StepStatus::Locked);
    }
}

#[test]
fn scenario_pointer_past_sequential_phase() {
    // Pointer at 8, just past the gate at 7.
    let status = IdeaStatus::Active;
    assert_eq!(step_status(StepNumber::new(3).unwrap(), 8, status), StepStatus::Completed);
    assert_eq!(step_status(StepNumber::new(7).unwrap(), 8, status), StepStatus::Completed);
    assert_eq!(step_status(StepNumber::new(10).unwrap(), 8, status), StepStatus::Available);
    assert_eq!(step_status(StepNumber::new(13).unwrap(), 8, status), StepStatus::Available);
}

proptest! {
    /// The engine is total: every (step, pointer, status) triple yields
    /// exactly one of the four states without panicking.
    #[test]
    fn prop_engine_is_total(
        step_raw in 1u8..=STEP_COUNT,
        current in 1u8..=COMPLETION_POINTER,
        completed in any::<bool>(),
    ) {
        let step = StepNumber::new(step_raw).unwrap();
        let status = if completed { IdeaStatus::Completed } else { IdeaStatus::Active };
        let state = step_status(step, current, status);
        prop_assert!(matches!(
            state,
            StepStatus::Completed | StepStatus::Current | StepStatus::Available | StepStatus::Locked
        ));
    }

    /// Completed sequential steps form a prefix: no sequential step is
    /// completed while an earlier one is not.
    #[test]
    fn prop_sequential_completed_is_a_prefix(
        current in 1u8..=COMPLETION_POINTER,
        completed in any::<bool>(),
    ) {
        let status = if completed { IdeaStatus::Completed } else { IdeaStatus::Active };
        let mut seen_incomplete = false;
        for step in all_step_numbers() {
            if step.phase() != Phase::Discovery {
                continue;
            }
            let done = step_status(step, current, status) == StepStatus::Completed;
            if !done {
                seen_incomplete = true;
            }
            if done {
                prop_assert!(!seen_incomplete, "step {step} completed after an incomplete one");
            }
        }
    }

    /// Fan-out steps are never Available while the pointer is at or before
    /// the gate.
    #[test]
    fn prop_no_fan_out_before_the_gate(
        step_raw in 1u8..=STEP_COUNT,
        current in 1u8..=STEP_COUNT,
    ) {
        prop_assume!(current <= fan_out_gate().get());
        let step = StepNumber::new(step_raw).unwrap();
        let state = step_status(step, current, IdeaStatus::Active);
        prop_assert_ne!(state, StepStatus::Available);
    }

    /// Exactly one step is Current for an active idea that is not finished.
    #[test]
    fn prop_exactly_one_current(current in 1u8..=STEP_COUNT) {
        let currents = all_step_numbers()
            .into_iter()
            .filter(|s| step_status(*s, current, IdeaStatus::Active) == StepStatus::Current)
            .count();
        prop_assert_eq!(currents, 1);
    }
}
