use serde::Serialize;
use tracing::{debug, instrument};

use super::render::NotificationMessage;
use super::NotificationError;
use crate::config::NotificationConfig;

/// Provider names understood by the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Resend,
    Unsupported(String),
}

impl ProviderKind {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "resend" => Self::Resend,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

/// A provider resolved from configuration, ready to deliver.
///
/// Resolution checks addresses first and then the active provider's key, so a
/// misconfigured deployment fails before any network traffic.
#[derive(Debug, Clone)]
pub enum EmailProvider {
    Resend(ResendProvider),
    Unsupported(String),
}

impl EmailProvider {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let (Some(from), Some(to)) = (config.from.as_ref(), config.to.as_ref()) else {
            return Err(NotificationError::MissingAddresses);
        };

        match ProviderKind::parse(&config.provider) {
            ProviderKind::Resend => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    NotificationError::MissingApiKey(NotificationConfig::api_key_var("resend"))
                })?;
                Ok(Self::Resend(ResendProvider {
                    api_url: config.resend_api_url.clone(),
                    api_key,
                    from: from.clone(),
                    to: to.clone(),
                }))
            }
            ProviderKind::Unsupported(name) => Ok(Self::Unsupported(name)),
        }
    }

    pub async fn deliver(
        &self,
        client: &reqwest::Client,
        message: &NotificationMessage,
    ) -> Result<(), NotificationError> {
        match self {
            Self::Resend(provider) => provider.send(client, message).await,
            Self::Unsupported(name) => Err(NotificationError::UnsupportedProvider(name.clone())),
        }
    }
}

/// Resend's `POST /emails` endpoint.
#[derive(Clone)]
pub struct ResendProvider {
    api_url: String,
    api_key: String,
    from: String,
    to: String,
}

impl std::fmt::Debug for ResendProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendProvider")
            .field("api_url", &self.api_url)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

impl ResendProvider {
    fn endpoint(&self) -> String {
        format!("{}/emails", self.api_url.trim_end_matches('/'))
    }

    #[instrument(skip_all, fields(provider = "resend", to = %self.to))]
    async fn send(
        &self,
        client: &reqwest::Client,
        message: &NotificationMessage,
    ) -> Result<(), NotificationError> {
        let payload = ResendEmail {
            from: &self.from,
            to: [&self.to],
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Provider {
                provider: "Resend",
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "resend accepted message");
        Ok(())
    }
}
