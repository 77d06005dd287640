use super::super::domain::{Goal, GoalOperator};

/// Inclusive threshold check: `AtLeast` goals pass at or above the target,
/// `AtMost` goals at or below it.
pub(crate) fn within_target(value: f64, goal: &Goal) -> bool {
    match goal.operator {
        GoalOperator::AtLeast => value >= goal.target_value,
        GoalOperator::AtMost => value <= goal.target_value,
    }
}
