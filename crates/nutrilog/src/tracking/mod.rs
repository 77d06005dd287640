//! Metric, goal, and daily-record tracking plus the goal evaluation engine.
//!
//! The engine itself is pure: callers hand it already-materialized
//! collections and an explicit `today`, and get a fresh result each call.
//! Persistence stays behind [`repository::TrackingRepository`] so the
//! service and router can run against any store implementation.

pub mod catalog;
pub mod domain;
pub(crate) mod evaluation;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DailyRecord, Goal, GoalDraft, GoalId, GoalOperator, Metric, MetricDraft, MetricId,
    RecordDraft, RecordId,
};
pub use evaluation::{EvaluationEngine, GoalSummary, TrendPoint};
pub use import::{DailyLogImportError, DailyLogImporter, DailyLogRow};
pub use repository::{RecordQuery, RepositoryError, TrackingRepository};
pub use router::tracking_router;
pub use service::{
    DashboardView, GoalView, ImportOutcome, RecordStatusView, RecordView, TrackingService,
    TrackingServiceError, ValidationError,
};
