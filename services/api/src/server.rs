use crate::cli::ServeArgs;
use crate::infra::{
    catalog_source, institution_directory, AppState, InMemoryDocumentArchive,
    InMemoryPatientRepository,
};
use crate::routes::with_app_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use preventiva::config::AppConfig;
use preventiva::error::AppError;
use preventiva::telemetry;
use preventiva::workflows::intake::IntakeService;
use preventiva::workflows::prevention::PreventionState;
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

    let repository = Arc::new(InMemoryPatientRepository::default());
    let documents = Arc::new(InMemoryDocumentArchive::default());
    let intake_service = Arc::new(IntakeService::new(
        repository,
        documents,
        config.sources.drive_folder_id.clone(),
    ));
    let prevention_state = PreventionState {
        catalog: catalog_source(&config.sources),
        institutions: institution_directory(&config.sources),
    };

    let app = with_app_routes(intake_service, prevention_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "preventive care service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
