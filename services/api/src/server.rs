use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_print_request_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use poster_intake::config::AppConfig;
use poster_intake::error::AppError;
use poster_intake::telemetry;
use poster_intake::workflows::print_request::{
    PdfiumRasterizer, SubmissionService, WebhookDispatcher,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.webhook.endpoint_url.is_none() {
        warn!("POSTER_WEBHOOK_URL is not set; dispatch attempts will fail until it is configured");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySessionStore::default());
    let dispatcher = Arc::new(WebhookDispatcher::from_config(&config.webhook));
    let rasterizer = Arc::new(PdfiumRasterizer::new());
    let submission_service = Arc::new(SubmissionService::new(store, dispatcher, rasterizer));

    let app = with_print_request_routes(submission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "poster print intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
