use crate::cli::ServeArgs;
use crate::infra::{connect_store, report_notification_readiness, AppState};
use crate::routes::with_quote_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use freight_quote::config::AppConfig;
use freight_quote::error::AppError;
use freight_quote::quotes::{EmailNotifier, QuoteIntakeService, SqliteQuoteStore};
use freight_quote::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = connect_store(&config.storage).await;
    report_notification_readiness(&config.notification);

    let app = with_quote_routes(Arc::new(build_service(&config, store)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "freight quote intake ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_service(
    config: &AppConfig,
    store: Option<Arc<SqliteQuoteStore>>,
) -> QuoteIntakeService<SqliteQuoteStore, EmailNotifier> {
    let notifier = Arc::new(EmailNotifier::new(config.notification.clone()));
    QuoteIntakeService::new(store, notifier).with_error_details(config.notification.debug_errors)
}
