use freight_quote::config::{NotificationConfig, StorageConfig};
use freight_quote::quotes::{EmailProvider, SqliteQuoteStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Connect the quotes store when a database URL is configured.
///
/// An unreachable database leaves the service running without persistence;
/// quote emails still go out.
pub(crate) async fn connect_store(config: &StorageConfig) -> Option<Arc<SqliteQuoteStore>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; quote submissions will not be persisted");
        return None;
    };

    match SqliteQuoteStore::connect(url).await {
        Ok(store) => Some(Arc::new(store)),
        Err(err) => {
            error!(error = %err, "quote store unavailable; continuing without persistence");
            None
        }
    }
}

/// Log incomplete email settings at startup; requests fail until they are fixed.
pub(crate) fn report_notification_readiness(config: &NotificationConfig) {
    match EmailProvider::from_config(config) {
        Ok(EmailProvider::Resend(_)) => info!(provider = "resend", "email notifications enabled"),
        Ok(EmailProvider::Unsupported(name)) => {
            warn!(provider = %name, "configured email provider is not implemented");
        }
        Err(err) => {
            warn!(error = %err, provider = %config.provider, "email notifications are not configured");
        }
    }
}
