use crate::cli::ServeArgs;
use crate::infra::{in_memory_engine, load_campaigns, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campaign_engine::config::AppConfig;
use campaign_engine::error::AppError;
use campaign_engine::telemetry;
use std::net::SocketAddr;
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
    if let Some(path) = args.campaigns.take() {
        config.engine.campaign_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let campaigns = load_campaigns(config.engine.campaign_csv.as_deref(), &config.engine)?;
    let campaign_count = campaigns.len();
    let (services, _) = in_memory_engine(campaigns, &config.engine);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_operational_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        campaigns = campaign_count,
        business_offset = %config.engine.business_offset,
        "campaign engine ready"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
