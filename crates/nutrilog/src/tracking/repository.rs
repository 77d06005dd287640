use chrono::NaiveDate;

use super::domain::{
    DailyRecord, Goal, GoalDraft, GoalId, Metric, MetricDraft, MetricId, RecordDraft,
};

/// Filters for listing daily records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordQuery {
    pub metric_id: Option<MetricId>,
    pub date: Option<NaiveDate>,
}

/// Storage abstraction so the service and router can be exercised against
/// in-memory doubles.
///
/// Implementations own the relational invariants: they assign identifiers,
/// keep at most one record per `(metric_id, date)` pair (upsert on save),
/// refuse inserts that reference a missing metric, and refuse to delete a
/// metric that goals or records still reference. Listing methods make no
/// ordering guarantee.
pub trait TrackingRepository: Send + Sync {
    fn metrics(&self) -> Result<Vec<Metric>, RepositoryError>;
    fn insert_metric(&self, draft: MetricDraft) -> Result<Metric, RepositoryError>;
    fn update_metric(&self, metric: Metric) -> Result<Metric, RepositoryError>;
    fn delete_metric(&self, id: MetricId) -> Result<(), RepositoryError>;

    fn goals(&self) -> Result<Vec<Goal>, RepositoryError>;
    fn insert_goal(&self, draft: GoalDraft) -> Result<Goal, RepositoryError>;
    fn update_goal(&self, goal: Goal) -> Result<Goal, RepositoryError>;
    fn delete_goal(&self, id: GoalId) -> Result<(), RepositoryError>;

    fn records(&self, query: RecordQuery) -> Result<Vec<DailyRecord>, RepositoryError>;
    fn upsert_record(&self, draft: RecordDraft) -> Result<DailyRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record is still referenced by dependent rows")]
    Referenced,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
