//! Command Telemetry
//!
//! Best-effort record of each dispatched command. Delivery runs on its own
//! task; a failed or slow endpoint never holds up the command itself.
//! Short-lived callers flush before exiting so pending events get a bounded
//! chance to arrive.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::TelemetryConfig;
use crate::error::{Error, Result};
use crate::models::PackageManager;

/// One log record, serialized as the endpoint expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEvent {
    /// Command or link that was dispatched
    pub cmd: String,
    pub package_manager: PackageManager,
    pub os: String,
    pub client_version: String,
}

impl CommandEvent {
    /// Event for this machine and build
    pub fn new(cmd: impl Into<String>, package_manager: PackageManager) -> Self {
        Self {
            cmd: cmd.into(),
            package_manager,
            os: std::env::consts::OS.to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Receiver of command events
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Record `event` without waiting for delivery
    fn record(&self, event: CommandEvent);

    /// Wait up to `timeout` for recorded events to be delivered. Never fails.
    async fn flush(&self, _timeout: Duration) {}
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record(&self, event: CommandEvent) {
        trace!("Telemetry disabled, dropping event for '{}'", event.cmd);
    }
}

/// Posts events as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpTelemetry {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl HttpTelemetry {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(format!("failed to build telemetry client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            token,
            pending: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Build from config, reading the bearer token from the configured variable
    pub fn from_config(config: &TelemetryConfig) -> Result<Self> {
        let token = config
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|token| !token.is_empty());
        Self::new(config.endpoint.clone(), token)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Deliver `event` and wait for the response
    pub async fn send(&self, event: &CommandEvent) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(event);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Other(format!("telemetry request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Other(format!("telemetry endpoint returned HTTP {}", status)));
        }
        Ok(())
    }

    /// Deliveries not yet awaited by [`TelemetrySink::flush`]
    pub fn pending(&self) -> usize {
        self.lock_pending().iter().filter(|h| !h.is_finished()).count()
    }

    fn lock_pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TelemetrySink for HttpTelemetry {
    fn record(&self, event: CommandEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, telemetry event for '{}' dropped", event.cmd);
            return;
        };

        let sink = self.clone();
        let handle = runtime.spawn(async move {
            match sink.send(&event).await {
                Ok(()) => trace!("Telemetry delivered for '{}'", event.cmd),
                Err(e) => debug!("Telemetry for '{}' not delivered: {}", event.cmd, e),
            }
        });

        let mut pending = self.lock_pending();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    async fn flush(&self, timeout: Duration) {
        let handles = std::mem::take(&mut *self.lock_pending());
        if handles.is_empty() {
            return;
        }

        let count = handles.len();
        if tokio::time::timeout(timeout, futures::future::join_all(handles))
            .await
            .is_err()
        {
            debug!("Gave up on {} telemetry event(s) after {:?}", count, timeout);
        }
    }
}

/// The sink selected by `config`
pub fn from_config(config: &TelemetryConfig) -> Arc<dyn TelemetrySink> {
    if !config.enabled {
        return Arc::new(NoopTelemetry);
    }

    match HttpTelemetry::from_config(config) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            warn!("Telemetry disabled: {}", e);
            Arc::new(NoopTelemetry)
        }
    }
}
