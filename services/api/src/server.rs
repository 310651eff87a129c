use crate::cli::ServeArgs;
use crate::infra::{file_source, AppState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use regional_insight::config::AppConfig;
use regional_insight::error::AppError;
use regional_insight::snapshot::SnapshotSource;
use regional_insight::telemetry;
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
    if let Some(snapshot) = args.snapshot.take() {
        config.data.snapshot_path = snapshot;
    }

    telemetry::init(&config.telemetry)?;

    let source = Arc::new(file_source(&config.data));
    let snapshot = source.list_villages()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(source, snapshot, config.engine, prometheus_handle);
    let readiness_flag = app_state.readiness.clone();

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        readiness = ?config.engine.readiness,
        "regional insight service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
