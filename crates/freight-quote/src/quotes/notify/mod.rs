//! Quote notification emails: rendering and provider delivery.

pub mod provider;
pub mod render;

use async_trait::async_trait;

use crate::config::NotificationConfig;
use crate::quotes::domain::{QuoteRequest, SubmissionContext};

pub use provider::{EmailProvider, ProviderKind, ResendProvider};
pub use render::{render, NotificationMessage, NOTIFICATION_SUBJECT};

/// Outbound hook invoked once per accepted quote.
#[async_trait]
pub trait QuoteNotifier: Send + Sync {
    async fn notify(
        &self,
        request: &QuoteRequest,
        context: &SubmissionContext,
    ) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("EMAIL_FROM and EMAIL_TO must be configured in environment.")]
    MissingAddresses,
    #[error("{0} must be configured in environment.")]
    MissingApiKey(String),
    #[error("Unsupported email provider: {0}")]
    UnsupportedProvider(String),
    #[error("{provider} API error ({status}): {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("email transport failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl NotificationError {
    /// True when the failure comes from deployment settings rather than the
    /// provider or network.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingAddresses | Self::MissingApiKey(_) | Self::UnsupportedProvider(_)
        )
    }
}

/// Sends quote notifications through the provider named in configuration.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    config: NotificationConfig,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: NotificationConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl QuoteNotifier for EmailNotifier {
    async fn notify(
        &self,
        request: &QuoteRequest,
        context: &SubmissionContext,
    ) -> Result<(), NotificationError> {
        let provider = EmailProvider::from_config(&self.config)?;
        let message = render(request, &context.submitted_at_iso());
        provider.deliver(&self.client, &message).await
    }
}
