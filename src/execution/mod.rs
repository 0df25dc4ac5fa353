//! Shell Execution
//!
//! Drives one shell command from terminal acquisition to completion:
//!
//! ```text
//! Idle -> AcquiringTerminal -> AwaitingShellIntegration -> Executing -> Streaming -> Completed
//!                                      |                                               ^
//!                                      +---- timeout: text sent, no output ------------+
//! ```
//!
//! Any error on the way ends in `Failed`.

pub mod driver;
pub mod lease;

pub use driver::{Execution, ShellExecutionDriver};
pub use lease::TerminalLease;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::terminal::ExecutionStream;

/// Phase of a single execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionState {
    Idle,
    AcquiringTerminal,
    AwaitingShellIntegration,
    Executing,
    Streaming,
    Completed,
    Failed,
}

impl ExecutionState {
    /// Whether the execution can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Completed | ExecutionState::Failed)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Idle => "idle",
            ExecutionState::AcquiringTerminal => "acquiring-terminal",
            ExecutionState::AwaitingShellIntegration => "awaiting-shell-integration",
            ExecutionState::Executing => "executing",
            ExecutionState::Streaming => "streaming",
            ExecutionState::Completed => "completed",
            ExecutionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which terminal a command runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalChoice {
    /// The active terminal, created and made active if there is none
    Reuse,
    /// A new terminal, disposed once the command is done
    #[default]
    Fresh,
}

impl TerminalChoice {
    /// Map the `terminal.new_terminal` setting
    pub fn from_new_terminal(new_terminal: bool) -> Self {
        if new_terminal {
            TerminalChoice::Fresh
        } else {
            TerminalChoice::Reuse
        }
    }
}

/// How the command was dispatched
#[derive(Debug)]
pub enum ExecutionMode {
    /// Shell integration was available; output streams back
    RichExecution(ExecutionStream),
    /// Shell integration never came up; the command was typed in blind
    FireAndForget,
}

impl ExecutionMode {
    pub fn kind(&self) -> ExecutionModeKind {
        match self {
            ExecutionMode::RichExecution(_) => ExecutionModeKind::RichExecution,
            ExecutionMode::FireAndForget => ExecutionModeKind::FireAndForget,
        }
    }
}

/// [`ExecutionMode`] without the stream, for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionModeKind {
    RichExecution,
    FireAndForget,
}

impl fmt::Display for ExecutionModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionModeKind::RichExecution => f.write_str("rich"),
            ExecutionModeKind::FireAndForget => f.write_str("fire-and-forget"),
        }
    }
}

/// Outcome of a finished execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Command as dispatched
    pub command: String,
    pub mode: ExecutionModeKind,
    /// Final state, always `Completed` for a returned report
    pub state: ExecutionState,
    /// Sanitized output lines
    pub output: Vec<String>,
    /// Streaming stopped early on cancellation
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionReport {
    /// Output joined with newlines
    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
