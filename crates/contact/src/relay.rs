use async_trait::async_trait;
use serde::Deserialize;
use yurline_shared::{ContactForm, ErrorCode, SubmissionResult};
use yurline_telegram::ContactNotifier;

/// The relay call itself could not complete.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay unavailable: {0}")]
    Transport(String),
}

/// Delivers one contact submission.
///
/// Exactly one network call per invocation: no retry, queueing or batching.
/// Delivery problems come back as `SubmissionResult { success: false, .. }`;
/// `Err` is reserved for a relay that could not be invoked at all.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    async fn send_message(&self, form: &ContactForm) -> Result<SubmissionResult, RelayError>;
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<ErrorCode>,
}

/// Calls the trusted relay function over HTTP; secrets stay server side.
#[derive(Debug, Clone)]
pub struct FunctionRelay {
    http: reqwest::Client,
    url: String,
}

impl FunctionRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl NotificationRelay for FunctionRelay {
    async fn send_message(&self, form: &ContactForm) -> Result<SubmissionResult, RelayError> {
        tracing::debug!(url = %self.url, "Sending message via relay function");

        let response = match self.http.post(&self.url).json(form).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Error calling relay function");
                return Ok(SubmissionResult::failed(err.to_string()));
            }
        };

        let status = response.status();
        let reply = match response.json::<RelayReply>().await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(%status, error = %err, "Unreadable relay function response");
                return Ok(SubmissionResult::failed(format!(
                    "unexpected relay response ({status})"
                )));
            }
        };

        if reply.success {
            return Ok(SubmissionResult::delivered());
        }

        let error = reply
            .error
            .unwrap_or_else(|| format!("relay failed with status {status}"));
        tracing::debug!(%status, code = ?reply.code, %error, "Relay function rejected message");

        Ok(SubmissionResult::failed(error))
    }
}

/// Talks to Telegram directly. Only for trusted environments: it needs the
/// bot token wherever it runs.
#[derive(Debug, Clone)]
pub struct DirectRelay {
    notifier: Option<ContactNotifier>,
}

impl DirectRelay {
    pub fn new(notifier: ContactNotifier) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    pub fn unconfigured() -> Self {
        Self { notifier: None }
    }

    pub fn is_configured(&self) -> bool {
        self.notifier.is_some()
    }
}

#[async_trait]
impl NotificationRelay for DirectRelay {
    async fn send_message(&self, form: &ContactForm) -> Result<SubmissionResult, RelayError> {
        let Some(notifier) = &self.notifier else {
            tracing::error!("Telegram service is not properly configured");
            return Ok(SubmissionResult::failed("Telegram service not configured"));
        };

        match notifier.notify(form).await {
            Ok(_) => Ok(SubmissionResult::delivered()),
            Err(err) => {
                tracing::error!(error = %err, "Error sending message to Telegram");
                Ok(SubmissionResult::failed(err.to_string()))
            }
        }
    }
}
