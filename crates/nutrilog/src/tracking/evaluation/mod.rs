mod rules;
mod summary;
mod window;

pub use summary::{GoalSummary, TrendPoint};

pub(crate) use rules::within_target;

use chrono::NaiveDate;

use super::domain::{DailyRecord, Goal};

/// Stateless evaluator that restricts a metric's daily records to a trailing
/// day window, classifies each against the goal threshold, and reduces the
/// result to summary statistics. Every call is independent: the caller
/// supplies the records, the goal, and `today`, and receives a fresh result.
pub struct EvaluationEngine {
    window_days: u32,
}

impl EvaluationEngine {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Records that fall inside the window. Order is not guaranteed.
    pub fn windowed(&self, today: NaiveDate, records: &[DailyRecord]) -> Vec<DailyRecord> {
        window::clamp_to_window(records, today, self.window_days)
    }

    /// Summary statistics for the window, or `None` when the metric has no
    /// goal or the window holds no records. Never a zero-filled summary.
    pub fn summarize(
        &self,
        today: NaiveDate,
        records: &[DailyRecord],
        goal: Option<&Goal>,
    ) -> Option<GoalSummary> {
        let goal = goal?;
        let windowed = self.windowed(today, records);
        summary::summarize(&windowed, goal)
    }

    /// Date-ascending series for trend rendering, with the goal target
    /// echoed on each point when a goal exists.
    pub fn trend(
        &self,
        today: NaiveDate,
        records: &[DailyRecord],
        goal: Option<&Goal>,
    ) -> Vec<TrendPoint> {
        let windowed = self.windowed(today, records);
        summary::trend_points(&windowed, goal.map(|goal| goal.target_value))
    }
}
