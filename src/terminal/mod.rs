//! Terminal Abstraction
//!
//! The seams between the execution driver and whatever actually runs the
//! shell. A [`TerminalHost`] hands out terminals; a [`Terminal`] either
//! executes commands with captured output (once shell integration is up)
//! or just receives text.
//!
//! Output handling lives here too:
//!
//! - [`stream`] - the lazy per-command line stream
//! - [`output`] - splitting raw PTY bytes into lines
//! - [`integration`] - the escape-sequence markers delimiting a command
//! - [`sanitizer`] - cleaning and de-duplicating lines for display

pub mod integration;
pub mod output;
pub mod sanitizer;
pub mod stream;

pub use output::LineSplitter;
pub use sanitizer::OutputSanitizer;
pub use stream::ExecutionStream;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Shared handle to a terminal
pub type SharedTerminal = Arc<dyn Terminal>;

/// A terminal running one shell
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Unique identifier
    fn id(&self) -> &str;

    /// Whether structured execution with output capture is available now
    fn has_shell_integration(&self) -> bool;

    /// Resolves once shell integration becomes available.
    ///
    /// May never resolve for shells without integration; callers bound the
    /// wait themselves.
    async fn wait_for_shell_integration(&self);

    /// Run a command and stream its output lines
    async fn execute(&self, command: &str) -> Result<ExecutionStream>;

    /// Type text followed by Enter, without capturing anything
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Type `command` so that the shell exits once the command is done
    async fn send_detached(&self, command: &str) -> Result<()> {
        self.send_text(&format!("{}; exit", command)).await
    }

    /// Resolves once the shell has exited or the terminal is disposed
    async fn wait_for_exit(&self);

    /// Bring the terminal to the user's attention
    fn show(&self) {}

    /// Kill the shell and release the terminal. Idempotent.
    fn dispose(&self);

    /// Whether [`Terminal::dispose`] has run
    fn is_disposed(&self) -> bool;
}

/// Owner of the terminals available to the driver
#[async_trait]
pub trait TerminalHost: Send + Sync {
    /// The terminal the user currently works in, if any is alive
    async fn active_terminal(&self) -> Option<SharedTerminal>;

    /// Open a new terminal. It does not become active by itself.
    async fn create_terminal(&self) -> Result<SharedTerminal>;

    /// Make `terminal` the active terminal
    async fn set_active(&self, terminal: SharedTerminal);
}
