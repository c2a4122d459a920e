use proptest::prelude::*;

use membership_gateway::ErrorKind;

/// Planned outcome of one scripted step
#[derive(Debug, Clone, PartialEq)]
pub enum StepPlan {
    Succeed,
    Fail(ErrorKind),
}

pub fn error_kind_strategy() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![
        Just(ErrorKind::Transport),
        Just(ErrorKind::Rejected),
        Just(ErrorKind::Malformed),
    ]
}

pub fn step_plan_strategy() -> impl Strategy<Value = StepPlan> {
    prop_oneof![
        3 => Just(StepPlan::Succeed),
        1 => error_kind_strategy().prop_map(StepPlan::Fail),
    ]
}

/// Between zero and eight scripted steps
pub fn pipeline_plan_strategy() -> impl Strategy<Value = Vec<StepPlan>> {
    prop::collection::vec(step_plan_strategy(), 0..8)
}

/// Plausible email addresses for notification subjects
pub fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}@[a-z]{1,10}\\.(fi|com|org)"
}
