use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{GoalDraft, GoalId, MetricDraft, MetricId, RecordDraft};
use super::repository::{RecordQuery, RepositoryError, TrackingRepository};
use super::service::{TrackingService, TrackingServiceError};

/// Router builder exposing the metric, goal, record, and dashboard
/// endpoints.
pub fn tracking_router<S>(service: Arc<TrackingService<S>>) -> Router
where
    S: TrackingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/metrics",
            get(list_metrics::<S>).post(create_metric::<S>),
        )
        .route(
            "/api/v1/metrics/:metric_id",
            put(update_metric::<S>).delete(delete_metric::<S>),
        )
        .route("/api/v1/goals", get(list_goals::<S>).post(create_goal::<S>))
        .route(
            "/api/v1/goals/:goal_id",
            put(update_goal::<S>).delete(delete_goal::<S>),
        )
        .route(
            "/api/v1/records",
            get(list_records::<S>).post(log_record::<S>),
        )
        .route("/api/v1/dashboard/:metric_id", get(dashboard::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordListQuery {
    pub(crate) metric_id: Option<i64>,
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardQuery {
    pub(crate) window_days: Option<u32>,
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn list_metrics<S>(
    State(service): State<Arc<TrackingService<S>>>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.metrics() {
        Ok(metrics) => (StatusCode::OK, axum::Json(metrics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_metric<S>(
    State(service): State<Arc<TrackingService<S>>>,
    axum::Json(draft): axum::Json<MetricDraft>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.create_metric(draft) {
        Ok(metric) => (StatusCode::CREATED, axum::Json(metric)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_metric<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Path(metric_id): Path<i64>,
    axum::Json(draft): axum::Json<MetricDraft>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.update_metric(MetricId(metric_id), draft) {
        Ok(metric) => (StatusCode::OK, axum::Json(metric)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_metric<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Path(metric_id): Path<i64>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.delete_metric(MetricId(metric_id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_goals<S>(State(service): State<Arc<TrackingService<S>>>) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.goals() {
        Ok(goals) => (StatusCode::OK, axum::Json(goals)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_goal<S>(
    State(service): State<Arc<TrackingService<S>>>,
    axum::Json(draft): axum::Json<GoalDraft>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.create_goal(draft) {
        Ok(goal) => (StatusCode::CREATED, axum::Json(goal)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_goal<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Path(goal_id): Path<i64>,
    axum::Json(draft): axum::Json<GoalDraft>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.update_goal(GoalId(goal_id), draft) {
        Ok(goal) => (StatusCode::OK, axum::Json(goal)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_goal<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Path(goal_id): Path<i64>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.delete_goal(GoalId(goal_id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_records<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Query(query): Query<RecordListQuery>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    let query = RecordQuery {
        metric_id: query.metric_id.map(MetricId),
        date: query.date,
    };
    match service.records(query) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn log_record<S>(
    State(service): State<Arc<TrackingService<S>>>,
    axum::Json(draft): axum::Json<RecordDraft>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    match service.log_record(draft) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard<S>(
    State(service): State<Arc<TrackingService<S>>>,
    Path(metric_id): Path<i64>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: TrackingRepository + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match service.dashboard(MetricId(metric_id), query.window_days, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TrackingServiceError) -> Response {
    let status = match &error {
        TrackingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrackingServiceError::Import(_) => StatusCode::BAD_REQUEST,
        TrackingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TrackingServiceError::Repository(
            RepositoryError::Conflict | RepositoryError::Referenced,
        ) => StatusCode::CONFLICT,
        TrackingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
