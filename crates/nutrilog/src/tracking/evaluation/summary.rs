use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{DailyRecord, Goal, GoalOperator};
use super::rules::within_target;

/// Aggregated goal performance over one evaluation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub total_days: usize,
    pub days_within_target: usize,
    pub missed_target_days: usize,
    pub daily_average: f64,
    pub daily_deficit: f64,
    pub target_value: f64,
    pub operator: GoalOperator,
}

impl GoalSummary {
    /// Share of tracked days that met the goal, in `0.0..=1.0`. Suppressed
    /// instead of dividing by zero when the window holds no records.
    pub fn within_target_ratio(&self) -> Option<f64> {
        if self.total_days == 0 {
            return None;
        }
        Some(self.days_within_target as f64 / self.total_days as f64)
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reduce an already-windowed record set against its goal.
///
/// Absent when the set is empty, so "no data yet" stays distinguishable
/// from a window where every day missed the target.
pub(crate) fn summarize(records: &[DailyRecord], goal: &Goal) -> Option<GoalSummary> {
    if records.is_empty() {
        return None;
    }

    let values: Vec<f64> = records.iter().map(|record| record.value).collect();
    let days_within_target = records
        .iter()
        .filter(|record| within_target(record.value, goal))
        .count();
    let daily_average = mean(&values);
    let daily_deficit = match goal.operator {
        GoalOperator::AtLeast => (goal.target_value - daily_average).max(0.0),
        GoalOperator::AtMost => (daily_average - goal.target_value).max(0.0),
    };

    Some(GoalSummary {
        total_days: records.len(),
        days_within_target,
        missed_target_days: records.len() - days_within_target,
        daily_average,
        daily_deficit,
        target_value: goal.target_value,
        operator: goal.operator,
    })
}

/// Chart-ready point carrying the day's value and the goal target, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// Build the display series for trend rendering. Points are sorted
/// ascending by date before any sequential structure is derived from them;
/// the summary statistics themselves do not depend on input order.
pub(crate) fn trend_points(records: &[DailyRecord], target: Option<f64>) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .map(|record| TrendPoint {
            date: record.date,
            value: record.value,
            target,
        })
        .collect();
    points.sort_by_key(|point| point.date);
    points
}
