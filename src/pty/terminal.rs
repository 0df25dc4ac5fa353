//! PTY-backed Terminal
//!
//! One shell in one pseudoterminal. A router task turns PTY output into
//! lines and hands them to [`MarkerRouter`], which reports readiness and
//! fills the stream of the command currently running.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender as StdSender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use portable_pty::{Child, ChildKiller, MasterPty};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::process::spawn_shell;
use super::streams::send_input;
use crate::error::{Error, Result};
use crate::models::{ShellType, TerminalSession};
use crate::terminal::integration::{
    bootstrap_command, exit_after, wrap_command, MarkerRouter, RouteEvent,
};
use crate::terminal::{ExecutionStream, LineSplitter, Terminal};

/// How often a detached shell is checked for exit
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lock a mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A shell session in a PTY
pub struct PtyTerminal {
    id: String,
    shell_type: ShellType,
    session: Arc<Mutex<TerminalSession>>,
    router: Arc<Mutex<MarkerRouter>>,
    ready_rx: watch::Receiver<bool>,
    input_tx: Mutex<Option<StdSender<Vec<u8>>>>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
    // Held so the PTY stays open for the shell's lifetime
    _master: Mutex<Box<dyn MasterPty + Send>>,
    router_task: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl PtyTerminal {
    /// Start `shell` in `working_directory` and begin the integration handshake.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(shell: &Path, working_directory: &Path, dimensions: (u16, u16)) -> Result<Self> {
        let mut session = TerminalSession::new(shell.to_path_buf(), working_directory.to_path_buf());
        let spawned = spawn_shell(shell, working_directory, dimensions)?;
        session.mark_spawned(spawned.pid);

        let id = session.id.clone();
        let shell_type = session.shell_type;
        let session = Arc::new(Mutex::new(session));
        let router = Arc::new(Mutex::new(MarkerRouter::new()));
        let (ready_tx, ready_rx) = watch::channel(false);
        let (output_rx, input_tx) = spawned.streams.into_parts();

        let router_task = tokio::spawn(route_output(
            id.clone(),
            output_rx,
            Arc::clone(&router),
            Arc::clone(&session),
            ready_tx,
        ));

        let terminal = Self {
            id,
            shell_type,
            session,
            router,
            ready_rx,
            input_tx: Mutex::new(Some(input_tx)),
            child: Mutex::new(spawned.child),
            _master: Mutex::new(spawned.master),
            router_task: Mutex::new(Some(router_task)),
            disposed: AtomicBool::new(false),
        };

        match bootstrap_command(shell_type) {
            Some(bootstrap) => terminal.write_line(&bootstrap)?,
            None => debug!(
                "Shell {} has no integration support; terminal {} stays text-only",
                shell.display(),
                terminal.id
            ),
        }

        Ok(terminal)
    }

    /// Snapshot of the session bookkeeping
    pub fn session(&self) -> TerminalSession {
        lock(&self.session).clone()
    }

    pub fn shell(&self) -> PathBuf {
        lock(&self.session).shell.clone()
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let input = lock(&self.input_tx);
        let tx = input.as_ref().ok_or_else(|| Error::TerminalDisposed {
            terminal_id: self.id.clone(),
        })?;
        send_input(tx, format!("{}\n", line).as_bytes())
    }
}

/// Feed PTY output through the line splitter into the marker router
async fn route_output(
    terminal_id: String,
    mut output_rx: UnboundedReceiver<Vec<u8>>,
    router: Arc<Mutex<MarkerRouter>>,
    session: Arc<Mutex<TerminalSession>>,
    ready_tx: watch::Sender<bool>,
) {
    let mut splitter = LineSplitter::new();

    let route = |line: String| {
        let event = lock(&router).route_line(&line);
        match event {
            RouteEvent::Ready => {
                debug!("Terminal {} reported shell integration", terminal_id);
                lock(&session).mark_ready();
                let _ = ready_tx.send(true);
            }
            RouteEvent::Finished(status) => {
                debug!("Command in terminal {} finished with status {:?}", terminal_id, status);
            }
            RouteEvent::Started | RouteEvent::Forwarded | RouteEvent::Ignored => {}
        }
    };

    while let Some(chunk) = output_rx.recv().await {
        for line in splitter.push_bytes(&chunk) {
            route(line);
        }
    }

    if let Some(line) = splitter.flush() {
        route(line);
    }
    // The shell is gone; a command still running will never send its end marker
    lock(&router).end_capture();
    debug!("Output router for terminal {} exiting", terminal_id);
}

#[async_trait]
impl Terminal for PtyTerminal {
    fn id(&self) -> &str {
        &self.id
    }

    fn has_shell_integration(&self) -> bool {
        !self.is_disposed() && *self.ready_rx.borrow()
    }

    async fn wait_for_shell_integration(&self) {
        let mut ready_rx = self.ready_rx.clone();
        let became_ready = ready_rx.wait_for(|ready| *ready).await.is_ok();
        if !became_ready {
            // Router exited without the marker; readiness can no longer arrive
            std::future::pending::<()>().await;
        }
    }

    async fn execute(&self, command: &str) -> Result<ExecutionStream> {
        if self.is_disposed() {
            return Err(Error::TerminalDisposed {
                terminal_id: self.id.clone(),
            });
        }

        let (tx, stream) = ExecutionStream::channel();
        lock(&self.router).begin_capture(tx);

        if let Err(e) = self.write_line(&wrap_command(command, self.shell_type)) {
            lock(&self.router).end_capture();
            return Err(e);
        }

        debug!("Terminal {} executing: {}", self.id, command);
        Ok(stream)
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.write_line(text)?;
        debug!("Terminal {} received text: {}", self.id, text);
        Ok(())
    }

    async fn send_detached(&self, command: &str) -> Result<()> {
        self.write_line(&exit_after(command, self.shell_type))?;
        debug!("Terminal {} running detached: {}", self.id, command);
        Ok(())
    }

    async fn wait_for_exit(&self) {
        let mut interval = tokio::time::interval(EXIT_POLL_INTERVAL);
        loop {
            interval.tick().await;
            if self.is_disposed() {
                return;
            }

            let status = lock(&self.child).try_wait();
            match status {
                Ok(Some(status)) => {
                    debug!("Shell of terminal {} exited: {:?}", self.id, status);
                    self.dispose();
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Cannot query shell of terminal {}: {}", self.id, e);
                    return;
                }
            }
        }
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = lock(&self.child).kill() {
            debug!("Killing shell of terminal {}: {}", self.id, e);
        }
        // Dropping the sender stops the writer thread
        lock(&self.input_tx).take();
        lock(&self.router).end_capture();
        if let Some(task) = lock(&self.router_task).take() {
            task.abort();
        }
        lock(&self.session).mark_disposed();

        debug!("Terminal {} disposed", self.id);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Drop for PtyTerminal {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for PtyTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyTerminal")
            .field("id", &self.id)
            .field("shell_type", &self.shell_type)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
