//! Shell Execution Driver

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use super::{ExecutionMode, ExecutionModeKind, ExecutionReport, ExecutionState, TerminalChoice, TerminalLease};
use crate::config::TerminalConfig;
use crate::error::Result;
use crate::terminal::{OutputSanitizer, SharedTerminal, TerminalHost};

fn log_transition(command: &str, from: ExecutionState, to: ExecutionState) {
    debug!("Execution '{}': {} -> {}", command, from, to);
}

/// A dispatched command, holding its terminal until finished
#[derive(Debug)]
pub struct Execution {
    command: String,
    lease: TerminalLease,
    mode: ExecutionMode,
    state: ExecutionState,
    cancelled: bool,
    started_at: DateTime<Utc>,
}

impl Execution {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn mode(&self) -> &ExecutionMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ExecutionModeKind {
        self.mode.kind()
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn terminal(&self) -> &SharedTerminal {
        self.lease.terminal()
    }

    /// Whether cancellation cut the stream short
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Pull the next raw output line.
    ///
    /// `None` once the stream is exhausted, the token is tripped, or the
    /// command ran without output capture.
    pub async fn next_line(&mut self, cancel: &CancellationToken) -> Option<String> {
        if self.cancelled || self.state == ExecutionState::Completed {
            return None;
        }
        if cancel.is_cancelled() {
            self.cancelled = true;
            return None;
        }

        if self.state == ExecutionState::Executing {
            self.transition(ExecutionState::Streaming);
        }

        let ExecutionMode::RichExecution(stream) = &mut self.mode else {
            return None;
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Execution '{}' cancelled while streaming", self.command);
                self.cancelled = true;
                None
            }
            line = stream.next_line() => line,
        }
    }

    /// Release the terminal and summarize the run
    pub fn finish(mut self, output: Vec<String>) -> ExecutionReport {
        if self.state != ExecutionState::Completed {
            self.transition(ExecutionState::Completed);
        }
        self.lease.release();

        ExecutionReport {
            command: std::mem::take(&mut self.command),
            mode: self.mode.kind(),
            state: self.state,
            output,
            cancelled: self.cancelled,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }

    fn transition(&mut self, to: ExecutionState) {
        log_transition(&self.command, self.state, to);
        self.state = to;
    }
}

/// Runs commands in terminals provided by a [`TerminalHost`]
pub struct ShellExecutionDriver {
    host: Arc<dyn TerminalHost>,
    shell_integration_timeout: Duration,
    /// Terminals whose shell exits after a fire-and-forget command
    detached: Mutex<Vec<SharedTerminal>>,
}

impl ShellExecutionDriver {
    pub fn new(host: Arc<dyn TerminalHost>, shell_integration_timeout: Duration) -> Self {
        Self {
            host,
            shell_integration_timeout,
            detached: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(host: Arc<dyn TerminalHost>, config: &TerminalConfig) -> Self {
        Self::new(host, config.shell_integration_timeout())
    }

    pub fn shell_integration_timeout(&self) -> Duration {
        self.shell_integration_timeout
    }

    pub fn host(&self) -> &Arc<dyn TerminalHost> {
        &self.host
    }

    /// Dispatch `command` and hand back the live execution.
    ///
    /// If shell integration does not come up within the timeout the command
    /// is sent as plain text and the execution is already `Completed`.
    pub async fn execute(&self, command: &str, choice: TerminalChoice) -> Result<Execution> {
        let started_at = Utc::now();
        let mut state = ExecutionState::Idle;
        let mut advance = |to: ExecutionState| {
            log_transition(command, state, to);
            state = to;
        };

        advance(ExecutionState::AcquiringTerminal);
        let (mut lease, created) = match self.acquire(choice).await {
            Ok(acquired) => acquired,
            Err(e) => {
                advance(ExecutionState::Failed);
                return Err(e);
            }
        };
        lease.terminal().show();

        if !lease.terminal().has_shell_integration() {
            advance(ExecutionState::AwaitingShellIntegration);

            let wait = tokio::time::timeout(
                self.shell_integration_timeout,
                lease.terminal().wait_for_shell_integration(),
            )
            .await;

            if wait.is_err() {
                warn!(
                    "Shell integration unavailable after {:?} in terminal {}; sending command without output capture",
                    self.shell_integration_timeout,
                    lease.terminal().id()
                );

                // A shell this driver started exits with the command; the user's stays open
                let sent = if created {
                    lease.terminal().send_detached(command).await
                } else {
                    lease.terminal().send_text(command).await
                };
                if let Err(e) = sent {
                    advance(ExecutionState::Failed);
                    lease.release();
                    return Err(e);
                }

                if created {
                    self.lock_detached().push(lease.terminal().clone());
                }
                // Disposing now would kill the command; the terminal stays with the host
                if lease.is_owned() {
                    self.host.set_active(lease.hand_off()).await;
                }

                advance(ExecutionState::Completed);
                return Ok(Execution {
                    command: command.to_string(),
                    lease,
                    mode: ExecutionMode::FireAndForget,
                    state: ExecutionState::Completed,
                    cancelled: false,
                    started_at,
                });
            }
        }

        advance(ExecutionState::Executing);
        match lease.terminal().execute(command).await {
            Ok(stream) => Ok(Execution {
                command: command.to_string(),
                lease,
                mode: ExecutionMode::RichExecution(stream),
                state: ExecutionState::Executing,
                cancelled: false,
                started_at,
            }),
            Err(e) => {
                advance(ExecutionState::Failed);
                lease.release();
                Err(e)
            }
        }
    }

    /// Dispatch `command` and collect its sanitized output.
    ///
    /// Tripping `cancel` stops collecting and returns what arrived so far.
    pub async fn run(
        &self,
        command: &str,
        choice: TerminalChoice,
        cancel: &CancellationToken,
    ) -> Result<ExecutionReport> {
        let mut execution = self.execute(command, choice).await?;
        let mut sanitizer = OutputSanitizer::new();

        while let Some(line) = execution.next_line(cancel).await {
            sanitizer.push(&line);
        }

        let report = execution.finish(sanitizer.finish());
        info!(
            "Finished '{}' ({}, {} lines{})",
            report.command,
            report.mode,
            report.output.len(),
            if report.cancelled { ", cancelled" } else { "" }
        );
        Ok(report)
    }

    /// Whether fire-and-forget commands may still be running in shells this driver started
    pub fn has_detached(&self) -> bool {
        !self.lock_detached().is_empty()
    }

    /// Wait until every detached shell has exited.
    ///
    /// Returns `false` when `cancel` fired first; those shells are disposed,
    /// which ends their commands.
    pub async fn wait_for_detached(&self, cancel: &CancellationToken) -> bool {
        let terminals = std::mem::take(&mut *self.lock_detached());
        if terminals.is_empty() {
            return true;
        }

        info!("Waiting for {} command(s) running without output capture", terminals.len());
        let all_exited = futures::future::join_all(terminals.iter().map(|t| t.wait_for_exit()));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Cancelled while {} command(s) were still running", terminals.len());
                for terminal in &terminals {
                    terminal.dispose();
                }
                false
            }
            _ = all_exited => true,
        }
    }

    /// Lease a terminal; the flag tells whether it was created for this command
    async fn acquire(&self, choice: TerminalChoice) -> Result<(TerminalLease, bool)> {
        match choice {
            TerminalChoice::Fresh => {
                let terminal = self.host.create_terminal().await?;
                Ok((TerminalLease::owned(terminal), true))
            }
            TerminalChoice::Reuse => {
                if let Some(terminal) = self.host.active_terminal().await {
                    return Ok((TerminalLease::borrowed(terminal), false));
                }
                let terminal = self.host.create_terminal().await?;
                self.host.set_active(terminal.clone()).await;
                Ok((TerminalLease::borrowed(terminal), true))
            }
        }
    }

    fn lock_detached(&self) -> std::sync::MutexGuard<'_, Vec<SharedTerminal>> {
        self.detached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ShellExecutionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellExecutionDriver")
            .field("shell_integration_timeout", &self.shell_integration_timeout)
            .field("detached", &self.lock_detached().len())
            .finish_non_exhaustive()
    }
}
