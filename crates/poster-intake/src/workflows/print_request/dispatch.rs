//! Webhook dispatch: serialize the finalized submission and hand it to the
//! external approval workflow in a single HTTP round trip.

use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::WebhookConfig;

use super::domain::{Applicant, PosterFile};

/// Exact outbound contract of the approval workflow receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPayload {
    pub submitter_name: String,
    pub submitter_email: String,
    pub chosen_option: String,
    pub file_name: String,
    pub file_base64: String,
}

impl DispatchPayload {
    pub fn new(applicant: &Applicant, poster: &PosterFile, option_label: String) -> Self {
        Self {
            submitter_name: applicant.full_name(),
            submitter_email: applicant.email.clone(),
            chosen_option: option_label,
            file_name: poster.file_name.clone(),
            file_base64: STANDARD.encode(&poster.bytes),
        }
    }
}

/// Dispatch failure kinds. Detail stays internal; end users only learn that
/// delivery failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("webhook endpoint is not configured")]
    NotConfigured,
    #[error("webhook rejected the submission with status {status}")]
    Rejected { status: u16 },
    #[error("webhook request failed: {detail}")]
    Transport { detail: String },
    #[error("webhook request timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Outbound hand-off seam so the state machine can be exercised without a
/// live receiver.
pub trait DispatchGateway: Send + Sync {
    fn dispatch(
        &self,
        payload: DispatchPayload,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// Production gateway: one POST, one attempt, bounded timeout, no retries.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    endpoint_url: Option<String>,
    timeout_secs: u64,
}

impl WebhookDispatcher {
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self {
            endpoint_url: config.endpoint_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// The receiver signals acceptance with 200 or 202; everything else is a
/// rejection.
fn accepted(status: u16) -> bool {
    matches!(status, 200 | 202)
}

impl DispatchGateway for WebhookDispatcher {
    async fn dispatch(&self, payload: DispatchPayload) -> Result<(), DispatchError> {
        let endpoint = self
            .endpoint_url
            .as_deref()
            .ok_or(DispatchError::NotConfigured)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|err| DispatchError::Transport {
                detail: err.without_url().to_string(),
            })?;

        let response = client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DispatchError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    // without_url keeps the secret endpoint out of logs
                    DispatchError::Transport {
                        detail: err.without_url().to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        if accepted(status) {
            Ok(())
        } else {
            Err(DispatchError::Rejected { status })
        }
    }
}
