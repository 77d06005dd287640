use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricId(pub i64);

/// Identifier wrapper for threshold goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub i64);

/// Identifier wrapper for daily log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub i64);

/// A named, unit-tagged quantity tracked once per day (e.g. Protein/g).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: MetricId,
    pub name: String,
    pub unit: String,
}

/// Creation payload for a metric before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDraft {
    pub name: String,
    pub unit: String,
}

/// Threshold direction for a goal.
///
/// The wire labels keep the historical `">"` / `"<"` encoding, but both
/// comparisons are inclusive: an `AtLeast` goal is met at or above the
/// target and an `AtMost` goal at or below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalOperator {
    #[serde(rename = ">")]
    AtLeast,
    #[serde(rename = "<")]
    AtMost,
}

impl GoalOperator {
    pub const fn label(self) -> &'static str {
        match self {
            GoalOperator::AtLeast => "at least",
            GoalOperator::AtMost => "at most",
        }
    }
}

/// One-sided threshold applied to a metric's daily value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub metric_id: MetricId,
    pub operator: GoalOperator,
    pub target_value: f64,
}

/// Creation payload for a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub metric_id: MetricId,
    pub operator: GoalOperator,
    pub target_value: f64,
}

/// One observed value of one metric on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: RecordId,
    pub metric_id: MetricId,
    pub value: f64,
    pub date: NaiveDate,
}

/// Payload for logging a day's value. Saving upserts on `(metric_id, date)`
/// so each metric keeps at most one entry per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub metric_id: MetricId,
    pub value: f64,
    pub date: NaiveDate,
}
