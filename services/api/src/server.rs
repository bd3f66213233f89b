use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySavedFilterRepository, SampleOpportunityProvider};
use crate::routes::with_opportunity_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use opportunity_engine::config::AppConfig;
use opportunity_engine::error::AppError;
use opportunity_engine::opportunities::{
    CsvOpportunityProvider, OpportunityProvider, OpportunityService,
};
use opportunity_engine::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let saved_filters = Arc::new(InMemorySavedFilterRepository::default());
    let router = match config.data.opportunities_csv.clone() {
        Some(path) => {
            info!(path = %path.display(), "sourcing opportunities from csv export");
            build_router(Arc::new(CsvOpportunityProvider::new(path)), saved_filters)
        }
        None => {
            info!("no csv export configured; serving the bundled sample set");
            build_router(Arc::new(SampleOpportunityProvider), saved_filters)
        }
    };

    let app = router.layer(Extension(app_state)).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "opportunity engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Load the initial population before the listener opens. A failed load leaves the
/// board empty; `POST /api/v1/opportunities/refresh` can retry later.
fn build_router<P>(provider: Arc<P>, saved_filters: Arc<InMemorySavedFilterRepository>) -> Router
where
    P: OpportunityProvider + 'static,
{
    let service = Arc::new(OpportunityService::new(provider, saved_filters));
    match service.refresh() {
        Ok(outcome) => info!(scored = outcome.scored, "initial population scored"),
        Err(error) => warn!(%error, "initial opportunity load failed"),
    }
    with_opportunity_routes(service)
}
