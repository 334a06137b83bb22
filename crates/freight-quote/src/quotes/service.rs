use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use super::domain::{QuoteRequest, SubmissionContext};
use super::notify::{NotificationError, QuoteNotifier};
use super::store::{QuoteRecord, QuoteStore, StoreError};
use super::validation::{self, ValidationErrors};

/// What happened to the best-effort database write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOutcome {
    Stored,
    /// No store configured.
    Skipped,
    Failed,
}

/// Result of an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub request: QuoteRequest,
    pub persistence: PersistenceOutcome,
}

/// Failures visible to the caller. Persistence problems never appear here.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Rejected(#[from] ValidationErrors),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// Validates, records, and announces freight quote requests.
pub struct QuoteIntakeService<S, N> {
    store: Option<Arc<S>>,
    notifier: Arc<N>,
    expose_error_details: bool,
}

impl<S, N> QuoteIntakeService<S, N>
where
    S: QuoteStore + 'static,
    N: QuoteNotifier + 'static,
{
    pub fn new(store: Option<Arc<S>>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            expose_error_details: false,
        }
    }

    /// Echo notification error details to API clients.
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    pub fn exposes_error_details(&self) -> bool {
        self.expose_error_details
    }

    /// Run one submission through validation, storage, and notification.
    pub async fn submit(
        &self,
        payload: &Value,
        context: SubmissionContext,
    ) -> Result<SubmissionReceipt, IntakeError> {
        let request = match validation::validate(payload) {
            Ok(request) => request,
            Err(errors) => {
                warn!(
                    error_count = errors.messages().len(),
                    primary = errors.primary(),
                    "quote request rejected"
                );
                return Err(errors.into());
            }
        };

        let persistence = self.persist(&request, &context).await;

        if let Err(err) = self.notifier.notify(&request, &context).await {
            error!(
                error = %err,
                configuration = err.is_configuration(),
                "quote notification failed"
            );
            return Err(err.into());
        }

        info!(
            ip_address = context.ip_address.as_deref().unwrap_or("unknown"),
            freight_types = request.freight_type.len(),
            ?persistence,
            "quote request accepted"
        );

        Ok(SubmissionReceipt {
            request,
            persistence,
        })
    }

    async fn persist(
        &self,
        request: &QuoteRequest,
        context: &SubmissionContext,
    ) -> PersistenceOutcome {
        let Some(store) = self.store.as_ref() else {
            return PersistenceOutcome::Skipped;
        };

        let outcome: Result<(), StoreError> = async {
            let record = QuoteRecord::from_submission(request, context)?;
            store.insert(&record).await
        }
        .await;

        match outcome {
            Ok(()) => PersistenceOutcome::Stored,
            Err(err) => {
                error!(error = %err, "quote storage failed; continuing with notification");
                PersistenceOutcome::Failed
            }
        }
    }
}
