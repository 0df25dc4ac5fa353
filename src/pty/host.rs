//! PTY Terminal Host
//!
//! Creates [`PtyTerminal`]s for a project and remembers which one is active.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::process::get_user_shell;
use super::terminal::PtyTerminal;
use crate::config::TerminalConfig;
use crate::error::Result;
use crate::terminal::{SharedTerminal, TerminalHost};

/// Terminal host spawning shells in a PTY
pub struct PtyTerminalHost {
    shell: PathBuf,
    working_directory: PathBuf,
    dimensions: (u16, u16),
    active: Mutex<Option<SharedTerminal>>,
}

impl PtyTerminalHost {
    pub fn new(shell: PathBuf, working_directory: PathBuf, dimensions: (u16, u16)) -> Self {
        Self {
            shell,
            working_directory,
            dimensions,
            active: Mutex::new(None),
        }
    }

    /// Host for `working_directory` using the configured shell, or the user's shell
    pub fn from_config(config: &TerminalConfig, working_directory: PathBuf) -> Self {
        let shell = config.shell_path.clone().unwrap_or_else(get_user_shell);
        Self::new(shell, working_directory, config.dimensions)
    }

    pub fn shell(&self) -> &PathBuf {
        &self.shell
    }

    pub fn working_directory(&self) -> &PathBuf {
        &self.working_directory
    }
}

#[async_trait]
impl TerminalHost for PtyTerminalHost {
    async fn active_terminal(&self) -> Option<SharedTerminal> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.as_ref().is_some_and(|terminal| terminal.is_disposed()) {
            *active = None;
        }
        active.clone()
    }

    async fn create_terminal(&self) -> Result<SharedTerminal> {
        let terminal = PtyTerminal::spawn(&self.shell, &self.working_directory, self.dimensions)?;
        debug!(
            "Created terminal {} running {}",
            terminal.session().id,
            self.shell.display()
        );
        Ok(Arc::new(terminal))
    }

    async fn set_active(&self, terminal: SharedTerminal) {
        debug!("Terminal {} is now active", terminal.id());
        *self.active.lock().unwrap_or_else(|e| e.into_inner()) = Some(terminal);
    }
}
