//! Polling of asynchronous MySQL requests
//!
//! Account and privilege mutations return an async request id. The request
//! is polled until it reaches a terminal status or the attempt bound runs out.

use std::future::Future;
use std::time::Duration;

use tccloud_core::provider::{ErrorKind, ProviderResult};

use crate::config::AsyncPollConfig;

/// Status of an async request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncStatus {
    Pending,
    Succeeded,
    Failed,
}

impl AsyncStatus {
    /// Classify a remote status string; unknown statuses keep polling
    pub fn parse(status: &str) -> Self {
        match status {
            "SUCCESS" => AsyncStatus::Succeeded,
            "FAILED" | "KILLED" | "REMOVED" => AsyncStatus::Failed,
            _ => AsyncStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AsyncStatus::Pending)
    }
}

/// One observation of an async request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncRequestInfo {
    pub status: String,
    /// Remote explanation, surfaced verbatim on failure
    pub info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl From<&AsyncPollConfig> for PollSettings {
    fn from(config: &AsyncPollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            interval: config.interval(),
        }
    }
}

/// Poll `fetch` until the request succeeds, fails or the bound is exhausted
pub async fn wait_for_request<F, Fut>(
    request_id: &str,
    settings: PollSettings,
    mut fetch: F,
) -> ProviderResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<AsyncRequestInfo>>,
{
    for attempt in 1..=settings.max_attempts {
        let info = fetch().await?;
        match AsyncStatus::parse(&info.status) {
            AsyncStatus::Succeeded => {
                tracing::debug!(request_id, attempt, "async request succeeded");
                return Ok(());
            }
            AsyncStatus::Failed => {
                return Err(ErrorKind::AsyncFailure {
                    request_id: request_id.to_string(),
                    message: info.info,
                }
                .into());
            }
            AsyncStatus::Pending => {
                tracing::debug!(
                    request_id,
                    attempt,
                    status = %info.status,
                    "async request pending"
                );
                if attempt < settings.max_attempts {
                    tokio::time::sleep(settings.interval).await;
                }
            }
        }
    }

    Err(ErrorKind::AsyncTimeout {
        request_id: request_id.to_string(),
        attempts: settings.max_attempts,
    }
    .into())
}
