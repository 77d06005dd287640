use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::tracking::domain::{
    DailyRecord, Goal, GoalDraft, GoalId, GoalOperator, Metric, MetricDraft, MetricId,
    RecordDraft, RecordId,
};
use crate::tracking::repository::{RecordQuery, RepositoryError, TrackingRepository};
use crate::tracking::service::TrackingService;

pub(super) const DEFAULT_WINDOW_DAYS: u32 = 30;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn metric_draft(name: &str, unit: &str) -> MetricDraft {
    MetricDraft {
        name: name.to_string(),
        unit: unit.to_string(),
    }
}

pub(super) fn goal_draft(metric_id: MetricId, operator: GoalOperator, target: f64) -> GoalDraft {
    GoalDraft {
        metric_id,
        operator,
        target_value: target,
    }
}

pub(super) fn record_draft(metric_id: MetricId, value: f64, date: NaiveDate) -> RecordDraft {
    RecordDraft {
        metric_id,
        value,
        date,
    }
}

/// Bare goal for engine-level tests that bypass the store.
pub(super) fn goal(operator: GoalOperator, target: f64) -> Goal {
    Goal {
        id: GoalId(1),
        metric_id: MetricId(1),
        operator,
        target_value: target,
    }
}

/// Bare record for engine-level tests that bypass the store.
pub(super) fn record(id: i64, value: f64, date: NaiveDate) -> DailyRecord {
    DailyRecord {
        id: RecordId(id),
        metric_id: MetricId(1),
        value,
        date,
    }
}

pub(super) fn build_service() -> (TrackingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = TrackingService::new(store.clone(), DEFAULT_WINDOW_DAYS);
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
pub(super) struct MemoryStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    metrics: Vec<Metric>,
    goals: Vec<Goal>,
    records: Vec<DailyRecord>,
    next_metric_id: i64,
    next_goal_id: i64,
    next_record_id: i64,
}

impl TrackingRepository for MemoryStore {
    fn metrics(&self) -> Result<Vec<Metric>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.metrics.clone())
    }

    fn insert_metric(&self, draft: MetricDraft) -> Result<Metric, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.next_metric_id += 1;
        let metric = Metric {
            id: MetricId(inner.next_metric_id),
            name: draft.name,
            unit: draft.unit,
        };
        inner.metrics.push(metric.clone());
        Ok(metric)
    }

    fn update_metric(&self, metric: Metric) -> Result<Metric, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let slot = inner
            .metrics
            .iter_mut()
            .find(|existing| existing.id == metric.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = metric.clone();
        Ok(metric)
    }

    fn delete_metric(&self, id: MetricId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.goals.iter().any(|goal| goal.metric_id == id)
            || inner.records.iter().any(|record| record.metric_id == id)
        {
            return Err(RepositoryError::Referenced);
        }
        let index = inner
            .metrics
            .iter()
            .position(|metric| metric.id == id)
            .ok_or(RepositoryError::NotFound)?;
        inner.metrics.remove(index);
        Ok(())
    }

    fn goals(&self) -> Result<Vec<Goal>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.goals.clone())
    }

    fn insert_goal(&self, draft: GoalDraft) -> Result<Goal, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner
            .metrics
            .iter()
            .any(|metric| metric.id == draft.metric_id)
        {
            return Err(RepositoryError::NotFound);
        }
        inner.next_goal_id += 1;
        let goal = Goal {
            id: GoalId(inner.next_goal_id),
            metric_id: draft.metric_id,
            operator: draft.operator,
            target_value: draft.target_value,
        };
        inner.goals.push(goal.clone());
        Ok(goal)
    }

    fn update_goal(&self, goal: Goal) -> Result<Goal, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner
            .metrics
            .iter()
            .any(|metric| metric.id == goal.metric_id)
        {
            return Err(RepositoryError::NotFound);
        }
        let slot = inner
            .goals
            .iter_mut()
            .find(|existing| existing.id == goal.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = goal.clone();
        Ok(goal)
    }

    fn delete_goal(&self, id: GoalId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let index = inner
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or(RepositoryError::NotFound)?;
        inner.goals.remove(index);
        Ok(())
    }

    fn records(&self, query: RecordQuery) -> Result<Vec<DailyRecord>, RepositoryError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .records
            .iter()
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
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner
            .metrics
            .iter()
            .any(|metric| metric.id == draft.metric_id)
        {
            return Err(RepositoryError::NotFound);
        }

        if let Some(existing) = inner
            .records
            .iter_mut()
            .find(|record| record.metric_id == draft.metric_id && record.date == draft.date)
        {
            existing.value = draft.value;
            return Ok(existing.clone());
        }

        inner.next_record_id += 1;
        let record = DailyRecord {
            id: RecordId(inner.next_record_id),
            metric_id: draft.metric_id,
            value: draft.value,
            date: draft.date,
        };
        inner.records.push(record.clone());
        Ok(record)
    }
}

/// Store double whose every call fails, for surfacing outage handling.
pub(super) struct UnavailableStore;

impl TrackingRepository for UnavailableStore {
    fn metrics(&self) -> Result<Vec<Metric>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn insert_metric(&self, _draft: MetricDraft) -> Result<Metric, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update_metric(&self, _metric: Metric) -> Result<Metric, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn delete_metric(&self, _id: MetricId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn goals(&self) -> Result<Vec<Goal>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn insert_goal(&self, _draft: GoalDraft) -> Result<Goal, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update_goal(&self, _goal: Goal) -> Result<Goal, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn delete_goal(&self, _id: GoalId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn records(&self, _query: RecordQuery) -> Result<Vec<DailyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn upsert_record(&self, _draft: RecordDraft) -> Result<DailyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}
