//! Terminal Session Model
//!
//! Bookkeeping for one shell running behind a terminal: which shell,
//! where, and how far along its lifecycle it is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::ShellType;

/// State of the terminal session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// Shell spawned, shell integration not yet confirmed
    #[default]
    Starting,
    /// Shell integration confirmed, commands can be executed with output
    Ready,
    /// Shell has been killed and the session released
    Disposed,
}

/// Represents a shell session behind a terminal
#[derive(Debug, Clone)]
pub struct TerminalSession {
    /// Session identifier
    pub id: String,

    /// Shell executable
    pub shell: PathBuf,

    /// Type of shell being used
    pub shell_type: ShellType,

    /// Directory the shell was started in
    pub working_directory: PathBuf,

    /// OS process identifier of the shell
    pub pid: Option<u32>,

    /// Current session state
    pub state: SessionState,

    /// When session started
    pub start_time: DateTime<Utc>,

    /// When session was disposed
    pub end_time: Option<DateTime<Utc>>,
}

impl TerminalSession {
    /// Create a new terminal session
    pub fn new(shell: PathBuf, working_directory: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shell_type: ShellType::from_path(&shell),
            shell,
            working_directory,
            pid: None,
            state: SessionState::Starting,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Record the shell's PID once spawned
    pub fn mark_spawned(&mut self, pid: Option<u32>) {
        self.pid = pid;
    }

    /// Mark the session as ready (shell integration confirmed)
    pub fn mark_ready(&mut self) {
        if self.state == SessionState::Starting {
            self.state = SessionState::Ready;
        }
    }

    /// Mark the session as disposed
    pub fn mark_disposed(&mut self) {
        if self.state != SessionState::Disposed {
            self.state = SessionState::Disposed;
            self.end_time = Some(Utc::now());
        }
    }

    /// Check if shell integration is available
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready)
    }

    /// Check if the session is disposed
    pub fn is_disposed(&self) -> bool {
        matches!(self.state, SessionState::Disposed)
    }
}
