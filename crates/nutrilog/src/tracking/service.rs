use std::io::Read;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    DailyRecord, Goal, GoalDraft, GoalId, GoalOperator, Metric, MetricDraft, MetricId,
    RecordDraft, RecordId,
};
use super::evaluation::{within_target, EvaluationEngine, GoalSummary, TrendPoint};
use super::import::{normalize_metric_name, DailyLogImportError, DailyLogImporter};
use super::repository::{RecordQuery, RepositoryError, TrackingRepository};

/// How many rows the dashboard's recent-entries table returns.
const RECENT_ENTRY_LIMIT: usize = 10;

/// Service facade composing the store and the evaluation engine. All reads
/// and writes go through here so the router and CLI share one validation
/// boundary.
pub struct TrackingService<S> {
    store: Arc<S>,
    default_window_days: u32,
}

impl<S> TrackingService<S>
where
    S: TrackingRepository + 'static,
{
    pub fn new(store: Arc<S>, default_window_days: u32) -> Self {
        Self {
            store,
            default_window_days,
        }
    }

    pub fn default_window_days(&self) -> u32 {
        self.default_window_days
    }

    pub fn metrics(&self) -> Result<Vec<Metric>, TrackingServiceError> {
        let mut metrics = self.store.metrics()?;
        metrics.sort_by_key(|metric| metric.id);
        Ok(metrics)
    }

    pub fn create_metric(&self, draft: MetricDraft) -> Result<Metric, TrackingServiceError> {
        let draft = sanitize_metric(draft)?;
        Ok(self.store.insert_metric(draft)?)
    }

    pub fn update_metric(
        &self,
        id: MetricId,
        draft: MetricDraft,
    ) -> Result<Metric, TrackingServiceError> {
        let draft = sanitize_metric(draft)?;
        Ok(self.store.update_metric(Metric {
            id,
            name: draft.name,
            unit: draft.unit,
        })?)
    }

    /// Deletes a metric. Fails with a conflict while goals or records still
    /// reference it; the store owns that referential check.
    pub fn delete_metric(&self, id: MetricId) -> Result<(), TrackingServiceError> {
        Ok(self.store.delete_metric(id)?)
    }

    pub fn goals(&self) -> Result<Vec<GoalView>, TrackingServiceError> {
        let metrics = self.store.metrics()?;
        let mut goals = self.store.goals()?;
        goals.sort_by_key(|goal| goal.id);
        Ok(goals
            .into_iter()
            .filter_map(|goal| {
                let metric = metrics.iter().find(|metric| metric.id == goal.metric_id)?;
                Some(GoalView::joined(goal, metric))
            })
            .collect())
    }

    pub fn create_goal(&self, draft: GoalDraft) -> Result<Goal, TrackingServiceError> {
        require_finite("target_value", draft.target_value)?;
        Ok(self.store.insert_goal(draft)?)
    }

    pub fn update_goal(
        &self,
        id: GoalId,
        draft: GoalDraft,
    ) -> Result<Goal, TrackingServiceError> {
        require_finite("target_value", draft.target_value)?;
        Ok(self.store.update_goal(Goal {
            id,
            metric_id: draft.metric_id,
            operator: draft.operator,
            target_value: draft.target_value,
        })?)
    }

    pub fn delete_goal(&self, id: GoalId) -> Result<(), TrackingServiceError> {
        Ok(self.store.delete_goal(id)?)
    }

    /// Saves one day's value for a metric, replacing any entry already
    /// logged for the same `(metric_id, date)` pair.
    pub fn log_record(&self, draft: RecordDraft) -> Result<DailyRecord, TrackingServiceError> {
        require_finite("value", draft.value)?;
        Ok(self.store.upsert_record(draft)?)
    }

    /// Joined record views matching the query, ascending by date.
    pub fn records(&self, query: RecordQuery) -> Result<Vec<RecordView>, TrackingServiceError> {
        let metrics = self.store.metrics()?;
        let mut records = self.store.records(query)?;
        records.sort_by_key(|record| record.date);
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let metric = metrics
                    .iter()
                    .find(|metric| metric.id == record.metric_id)?;
                Some(RecordView::joined(record, metric))
            })
            .collect())
    }

    /// Assemble the dashboard for one metric over a trailing window ending
    /// at `today`.
    ///
    /// The summary is absent when the metric has no goal or no records fall
    /// inside the window; callers render an empty state rather than a
    /// zeroed one. When several goals reference the metric the first match
    /// wins.
    pub fn dashboard(
        &self,
        metric_id: MetricId,
        window_days: Option<u32>,
        today: NaiveDate,
    ) -> Result<DashboardView, TrackingServiceError> {
        let metric = self
            .store
            .metrics()?
            .into_iter()
            .find(|metric| metric.id == metric_id)
            .ok_or(RepositoryError::NotFound)?;

        let mut goals = self.store.goals()?;
        goals.sort_by_key(|goal| goal.id);
        let goal = goals.into_iter().find(|goal| goal.metric_id == metric_id);

        let records = self.store.records(RecordQuery {
            metric_id: Some(metric_id),
            date: None,
        })?;

        let window_days = window_days.unwrap_or(self.default_window_days);
        let engine = EvaluationEngine::new(window_days);

        let summary = engine.summarize(today, &records, goal.as_ref());
        let within_target_pct = summary
            .as_ref()
            .and_then(GoalSummary::within_target_ratio)
            .map(|ratio| ratio * 100.0);
        let trend = engine.trend(today, &records, goal.as_ref());

        let mut recent = engine.windowed(today, &records);
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let recent_entries = recent
            .into_iter()
            .take(RECENT_ENTRY_LIMIT)
            .map(|record| RecordStatusView {
                date: record.date,
                value: record.value,
                within_target: goal.as_ref().map(|goal| within_target(record.value, goal)),
            })
            .collect();

        let goal = goal.map(|goal| GoalView::joined(goal, &metric));

        Ok(DashboardView {
            metric,
            goal,
            window_days,
            today,
            summary,
            within_target_pct,
            trend,
            recent_entries,
        })
    }

    /// Bulk-loads daily records from a CSV export, matching metric names
    /// case-insensitively against the store. Rows naming an unknown metric
    /// are reported back, not silently dropped.
    pub fn import_daily_log<R: Read>(
        &self,
        reader: R,
    ) -> Result<ImportOutcome, TrackingServiceError> {
        let rows = DailyLogImporter::from_reader(reader)?;
        let metrics = self.store.metrics()?;

        let mut imported = 0usize;
        let mut unmatched = Vec::new();
        for row in rows {
            let key = normalize_metric_name(&row.metric);
            let Some(metric) = metrics
                .iter()
                .find(|metric| normalize_metric_name(&metric.name) == key)
            else {
                unmatched.push(row.metric);
                continue;
            };

            self.store.upsert_record(RecordDraft {
                metric_id: metric.id,
                value: row.value,
                date: row.date,
            })?;
            imported += 1;
        }

        Ok(ImportOutcome {
            imported,
            unmatched,
        })
    }
}

fn sanitize_metric(draft: MetricDraft) -> Result<MetricDraft, ValidationError> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    let unit = draft.unit.trim().to_string();
    if unit.is_empty() {
        return Err(ValidationError::MissingUnit);
    }
    Ok(MetricDraft { name, unit })
}

fn require_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Goal joined with its metric's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    pub id: GoalId,
    pub metric_id: MetricId,
    pub operator: GoalOperator,
    pub target_value: f64,
    pub metric_name: String,
    pub metric_unit: String,
}

impl GoalView {
    fn joined(goal: Goal, metric: &Metric) -> Self {
        Self {
            id: goal.id,
            metric_id: goal.metric_id,
            operator: goal.operator,
            target_value: goal.target_value,
            metric_name: metric.name.clone(),
            metric_unit: metric.unit.clone(),
        }
    }
}

/// Daily record joined with its metric's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub id: RecordId,
    pub metric_id: MetricId,
    pub value: f64,
    pub date: NaiveDate,
    pub metric_name: String,
    pub metric_unit: String,
}

impl RecordView {
    fn joined(record: DailyRecord, metric: &Metric) -> Self {
        Self {
            id: record.id,
            metric_id: record.metric_id,
            value: record.value,
            date: record.date,
            metric_name: metric.name.clone(),
            metric_unit: metric.unit.clone(),
        }
    }
}

/// One row of the dashboard's recent-entries table. `within_target` is
/// absent when the metric has no goal, which is a distinct state from
/// meeting or missing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordStatusView {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_target: Option<bool>,
}

/// Everything the dashboard needs for one metric and window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalView>,
    pub window_days: u32,
    pub today: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GoalSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_target_pct: Option<f64>,
    pub trend: Vec<TrendPoint>,
    pub recent_entries: Vec<RecordStatusView>,
}

/// Result of applying a daily-log export to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub unmatched: Vec<String>,
}

/// Error raised by the tracking service.
#[derive(Debug, thiserror::Error)]
pub enum TrackingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] DailyLogImportError),
}

/// Boundary checks applied before drafts reach the store.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("metric name is required")]
    MissingName,
    #[error("metric unit is required")]
    MissingUnit,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}
