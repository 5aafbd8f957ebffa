use crate::cli::ServeArgs;
use crate::infra::{
    load_dataset, AppState, InMemoryApplicationStore, InMemoryMatchResultRepository,
};
use crate::routes::with_match_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use intern_match::config::AppConfig;
use intern_match::error::AppError;
use intern_match::matching::{MatchingService, ScoringEngine};
use intern_match::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(seed) = args.seed.take() {
        config.matching.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = load_dataset(config.matching.seed_path.as_deref())?;
    let applications = Arc::new(InMemoryApplicationStore::from_dataset(dataset));
    let results = Arc::new(InMemoryMatchResultRepository::default());
    let weights = config.matching.weights;
    info!(
        skill = weights.skill,
        sector = weights.sector,
        location = weights.location,
        affirmative = weights.affirmative,
        applications = applications.application_count(),
        "scoring engine configured"
    );
    let service = Arc::new(MatchingService::new(
        applications,
        results,
        ScoringEngine::new(weights),
    ));

    let app = with_match_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship match engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
