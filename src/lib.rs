//! shadcn-term - install shadcn/ui components from the terminal
//!
//! Detects the project's package manager, fetches the component registry,
//! builds the matching `shadcn` CLI command and runs it in a shell session
//! inside a pseudoterminal, streaming back cleaned-up output.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`detection`] - Package manager detection from lockfiles
//! - [`commands`] - Install/init command strings and documentation links
//! - [`registry`] - Component index fetch and TTL cache
//! - [`execution`] - Terminal acquisition and command execution state machine
//! - [`terminal`] - Terminal traits, output streams and the output sanitizer
//! - [`pty`] - PTY-backed terminals via `portable-pty`
//! - [`actions`] - The user-facing commands tying it all together
//!
//! ### Support
//!
//! - [`config`] - TOML/JSON configuration with defaults
//! - [`telemetry`] - Best-effort command telemetry
//! - [`models`] - Package managers, components, shells and sessions
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shadcn_term::{Actions, ConfigLoader, PtyTerminalHost, TerminalChoice};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> shadcn_term::Result<()> {
//! let config = ConfigLoader::load()?;
//! let project = std::env::current_dir()?;
//! let host = Arc::new(PtyTerminalHost::from_config(&config.terminal, project.clone()));
//! let actions = Actions::from_config(&config, project, host)?;
//!
//! let outcome = actions
//!     .add_components(&["button", "card"], TerminalChoice::Fresh, &CancellationToken::new())
//!     .await?;
//! if let Some(report) = outcome.report() {
//!     println!("{}", report.output_text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Async runtime:** one tokio task per user action
//! - **PTY Reader Threads:** Read output from the shell (blocking I/O)
//! - **PTY Writer Threads:** Write commands to the shell (blocking I/O)
//! - **Router task:** turns shell output into readiness and per-command line streams
//!
//! Communication between threads happens via channels (`tokio::mpsc`).

#[macro_use]
extern crate tracing;

pub mod actions;
pub mod commands;
pub mod config;
pub mod detection;
pub mod error;
pub mod execution;
pub mod models;
pub mod pty;
pub mod registry;
pub mod telemetry;
pub mod terminal;

// Re-exports for core functionality
pub use actions::{ActionOutcome, Actions};
pub use commands::CommandBuilder;
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use detection::PackageManagerDetector;
pub use error::{Error, Result};
pub use execution::{ExecutionMode, ExecutionReport, ExecutionState, ShellExecutionDriver, TerminalChoice};
pub use models::{ComponentDescriptor, PackageManager};
pub use pty::PtyTerminalHost;
pub use registry::RegistryClient;
pub use terminal::OutputSanitizer;

// Version information
/// The current version of shadcn-term from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration from `config_path`, or from the default locations.
///
/// An explicit path must exist; without one, a missing file means defaults.
pub fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigLoader::load_from_path(path)
        }
        None => ConfigLoader::load(),
    }
}

/// Turn an error into a message with hints for the user
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::FetchFailed { url, reason } => {
            format!(
                "{}: {} ({})\n\nTry:\n• Check your network connection\n• Run `shadcn-term reload` to retry",
                error.user_message(),
                reason,
                url
            )
        }
        Error::ConfigLoadFailed { path, reason } => {
            format!(
                "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check the path passed to --config\n• Ensure file permissions are correct",
                path.display(),
                reason
            )
        }
        Error::ConfigParseFailed { format, reason } => {
            format!(
                "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Check configuration file syntax\n• Ensure file is valid {}",
                format, reason, format
            )
        }
        Error::ConfigValidationFailed { field, reason } => {
            format!(
                "Configuration Error: Validation failed for '{}': {}\n\nTry:\n• Fix or remove the value to use the default",
                field, reason
            )
        }
        Error::PtyCreationFailed { .. } | Error::CommandSpawnFailed { .. } => {
            format!(
                "Terminal Error: {}\n\nTry:\n• Set terminal.shell_path in the configuration\n• Check that $SHELL points to an installed shell",
                error
            )
        }
        _ => error.user_message(),
    }
}
