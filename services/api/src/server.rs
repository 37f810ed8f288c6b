use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::score_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pyme360::config::AppConfig;
use pyme360::error::AppError;
use pyme360::scoring::ScoreEngine;
use pyme360::telemetry;
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
    let options = config.scoring.options();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(ScoreEngine::new(options)),
        seed: config.scoring.seed,
    };

    let app = score_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        empty_history = ?options.empty_history,
        trend = ?options.trend,
        seeded = config.scoring.seed.is_some(),
        "pyme360 scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
