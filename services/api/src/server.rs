use crate::cli::ServeArgs;
use crate::infra::{
    default_scoring_config, load_item_catalog, AppState, InMemoryAssessmentRepository,
    LocalArtifactStore,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use milestone_dq::config::AppConfig;
use milestone_dq::error::AppError;
use milestone_dq::telemetry;
use milestone_dq::workflows::assessment::AssessmentService;
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

    let catalog = Arc::new(load_item_catalog(&config.catalog)?);
    info!(items = catalog.len(), "milestone item bank loaded");

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let artifacts = Arc::new(LocalArtifactStore);
    let assessment_service = Arc::new(AssessmentService::new(
        repository,
        artifacts,
        catalog,
        default_scoring_config(),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
