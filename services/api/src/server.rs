use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProposalRepository, InMemoryStatusNotifier};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tender_rank::config::AppConfig;
use tender_rank::error::AppError;
use tender_rank::telemetry;
use tender_rank::ProposalReviewService;
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
    let ranking_config = config.ranking.load()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryProposalRepository::default());
    let notifier = Arc::new(InMemoryStatusNotifier::default());
    let review_service = Arc::new(ProposalReviewService::new(
        repository,
        notifier,
        ranking_config,
    ));

    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        profile = ?config.ranking.profile_path,
        "proposal ranking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
