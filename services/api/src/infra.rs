use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use nutrilog::tracking::{
    DailyRecord, Goal, GoalDraft, GoalId, Metric, MetricDraft, MetricId, RecordDraft, RecordId,
    RecordQuery, RepositoryError, TrackingRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the HTTP service and CLI commands. Owns the
/// relational invariants the repository contract requires: id assignment,
/// `(metric_id, date)` upserts, and referential checks on metric deletion.
#[derive(Default)]
pub(crate) struct InMemoryTrackingStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    metrics: HashMap<i64, Metric>,
    goals: HashMap<i64, Goal>,
    records: HashMap<i64, DailyRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl TrackingRepository for InMemoryTrackingStore {
    fn metrics(&self) -> Result<Vec<Metric>, RepositoryError> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.metrics.values().cloned().collect())
    }

    fn insert_metric(&self, draft: MetricDraft) -> Result<Metric, RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        let id = tables.next_id();
        let metric = Metric {
            id: MetricId(id),
            name: draft.name,
            unit: draft.unit,
        };
        tables.metrics.insert(id, metric.clone());
        Ok(metric)
    }

    fn update_metric(&self, metric: Metric) -> Result<Metric, RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if !tables.metrics.contains_key(&metric.id.0) {
            return Err(RepositoryError::NotFound);
        }
        tables.metrics.insert(metric.id.0, metric.clone());
        Ok(metric)
    }

    fn delete_metric(&self, id: MetricId) -> Result<(), RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if tables.goals.values().any(|goal| goal.metric_id == id)
            || tables.records.values().any(|record| record.metric_id == id)
        {
            return Err(RepositoryError::Referenced);
        }
        tables
            .metrics
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn goals(&self) -> Result<Vec<Goal>, RepositoryError> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.goals.values().cloned().collect())
    }

    fn insert_goal(&self, draft: GoalDraft) -> Result<Goal, RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if !tables.metrics.contains_key(&draft.metric_id.0) {
            return Err(RepositoryError::NotFound);
        }
        let id = tables.next_id();
        let goal = Goal {
            id: GoalId(id),
            metric_id: draft.metric_id,
            operator: draft.operator,
            target_value: draft.target_value,
        };
        tables.goals.insert(id, goal.clone());
        Ok(goal)
    }

    fn update_goal(&self, goal: Goal) -> Result<Goal, RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if !tables.metrics.contains_key(&goal.metric_id.0) {
            return Err(RepositoryError::NotFound);
        }
        if !tables.goals.contains_key(&goal.id.0) {
            return Err(RepositoryError::NotFound);
        }
        tables.goals.insert(goal.id.0, goal.clone());
        Ok(goal)
    }

    fn delete_goal(&self, id: GoalId) -> Result<(), RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        tables
            .goals
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn records(&self, query: RecordQuery) -> Result<Vec<DailyRecord>, RepositoryError> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables
            .records
            .values()
            .filter(|record| {
                query
                    .metric_id
                    .map(|metric_id| record.metric_id == metric_id)
                    .unwrap_or(true)
                    && query.date.map(|date| record.date == date).unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    fn upsert_record(&self, draft: RecordDraft) -> Result<DailyRecord, RepositoryError> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if !tables.metrics.contains_key(&draft.metric_id.0) {
            return Err(RepositoryError::NotFound);
        }

        if let Some(existing) = tables
            .records
            .values_mut()
            .find(|record| record.metric_id == draft.metric_id && record.date == draft.date)
        {
            existing.value = draft.value;
            return Ok(existing.clone());
        }

        let id = tables.next_id();
        let record = DailyRecord {
            id: RecordId(id),
            metric_id: draft.metric_id,
            value: draft.value,
            date: draft.date,
        };
        tables.records.insert(id, record.clone());
        Ok(record)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
