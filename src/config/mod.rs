//! Configuration management for shadcn-term
//!
//! Every section has defaults matching the public shadcn/ui endpoints, so a
//! missing or partial config file is always usable.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Public component index of shadcn/ui
pub const DEFAULT_REGISTRY_URL: &str = "https://ui.shadcn.com/r/index.json";

/// Documentation root of shadcn/ui
pub const DEFAULT_DOCS_URL: &str = "https://ui.shadcn.com/docs";

/// Package runner target used for `add` and `init`
pub const DEFAULT_RUNNER: &str = "shadcn@latest";

/// Endpoint receiving command telemetry when enabled
pub const DEFAULT_TELEMETRY_ENDPOINT: &str = "https://shadcn-ui-logs.vercel.app/api/log";

/// Main configuration structure for shadcn-term
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Component registry configuration
    pub registry: RegistryConfig,

    /// Command generation configuration
    pub commands: CommandsConfig,

    /// Documentation links
    pub docs: DocsConfig,

    /// Terminal configuration
    pub terminal: TerminalConfig,

    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Registry fetch and cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// URL of the JSON component index
    pub url: String,

    /// How long a fetched component list stays fresh, in seconds
    pub cache_ttl_secs: u64,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            cache_ttl_secs: 5 * 60,
            request_timeout_secs: 30,
        }
    }
}

impl RegistryConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Command generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Package spec handed to the package runner
    pub runner: String,

    /// Pass `--bun` to bunx so the CLI runs on the bun runtime instead of node
    pub bun_force_runtime: bool,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.to_string(),
            bun_force_runtime: false,
        }
    }
}

/// Documentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Documentation root; component pages live under `<base_url>/components/`
    pub base_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DOCS_URL.to_string(),
        }
    }
}

/// Terminal-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Shell executable path; `None` uses `$SHELL`
    pub shell_path: Option<PathBuf>,

    /// Open a fresh terminal per command (disposed afterwards) instead of
    /// reusing the active one
    pub new_terminal: bool,

    /// Upper bound on waiting for shell integration, in milliseconds
    pub shell_integration_timeout_ms: u64,

    /// Terminal dimensions (cols, rows)
    pub dimensions: (u16, u16),
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            shell_path: None,
            new_terminal: true,
            shell_integration_timeout_ms: 5_000,
            dimensions: (120, 30),
        }
    }
}

impl TerminalConfig {
    pub fn shell_integration_timeout(&self) -> Duration {
        Duration::from_millis(self.shell_integration_timeout_ms)
    }
}

/// Telemetry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Send a log record for each dispatched command
    pub enabled: bool,

    /// Endpoint receiving the JSON log records
    pub endpoint: String,

    /// Environment variable holding the bearer token, if any
    pub token_env: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_TELEMETRY_ENDPOINT.to_string(),
            token_env: Some("BEARER_TOKEN".to_string()),
        }
    }
}
