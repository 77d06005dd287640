use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryTrackingStore};
use crate::routes::with_tracking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nutrilog::config::AppConfig;
use nutrilog::error::AppError;
use nutrilog::telemetry;
use nutrilog::tracking::catalog::standard_metrics;
use nutrilog::tracking::TrackingService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryTrackingStore::default());
    let service = Arc::new(TrackingService::new(
        store,
        config.dashboard.default_window_days,
    ));

    if args.seed_catalog {
        for draft in standard_metrics() {
            service.create_metric(draft)?;
        }
        info!("standard nutrient catalog seeded");
    }

    let app = with_tracking_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "nutrition tracking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
