//! Mock Terminal Implementation for Testing

use async_trait::async_trait;
use shadcn_term::error::{Error, Result};
use shadcn_term::terminal::{ExecutionStream, SharedTerminal, Terminal, TerminalHost};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Scripted terminal recording everything done to it
pub struct MockTerminal {
    id: String,
    ready: AtomicBool,
    /// `None`: integration never comes up
    ready_after: Option<Duration>,
    script: Vec<String>,
    keep_stream_open: bool,
    fail_execute: bool,
    never_exits: bool,
    open_streams: Mutex<Vec<UnboundedSender<String>>>,
    executed: Mutex<Vec<String>>,
    sent_text: Mutex<Vec<String>>,
    shown: AtomicUsize,
    disposed: AtomicBool,
}

impl MockTerminal {
    /// Integrated terminal answering every command with `lines`
    pub fn ready<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terminal = Self::base();
        terminal.ready = AtomicBool::new(true);
        terminal.ready_after = Some(Duration::ZERO);
        terminal.script = lines.into_iter().map(Into::into).collect();
        terminal
    }

    /// Terminal whose shell integration never comes up
    pub fn without_integration() -> Self {
        Self::base()
    }

    /// Terminal whose shell integration comes up after `delay`
    pub fn ready_after<I, S>(delay: Duration, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terminal = Self::ready(lines);
        terminal.ready = AtomicBool::new(false);
        terminal.ready_after = Some(delay);
        terminal
    }

    /// Send the script but never end the stream
    pub fn keep_stream_open(mut self) -> Self {
        self.keep_stream_open = true;
        self
    }

    /// Make `execute` fail
    pub fn failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    /// Shell that keeps running until disposed
    pub fn never_exits(mut self) -> Self {
        self.never_exits = true;
        self
    }

    fn base() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ready: AtomicBool::new(false),
            ready_after: None,
            script: Vec::new(),
            keep_stream_open: false,
            fail_execute: false,
            never_exits: false,
            open_streams: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
            sent_text: Mutex::new(Vec::new()),
            shown: AtomicUsize::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn sent_text(&self) -> Vec<String> {
        self.sent_text.lock().unwrap().clone()
    }

    pub fn times_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Terminal for MockTerminal {
    fn id(&self) -> &str {
        &self.id
    }

    fn has_shell_integration(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn wait_for_shell_integration(&self) {
        match self.ready_after {
            Some(delay) => {
                tokio::time::sleep(delay).await;
                self.ready.store(true, Ordering::SeqCst);
            }
            None => std::future::pending::<()>().await,
        }
    }

    async fn execute(&self, command: &str) -> Result<ExecutionStream> {
        if self.is_disposed() {
            return Err(Error::TerminalDisposed {
                terminal_id: self.id.clone(),
            });
        }
        if self.fail_execute {
            return Err(Error::PtyInputSendFailed {
                reason: "mock writer closed".to_string(),
            });
        }

        self.executed.lock().unwrap().push(command.to_string());
        let (tx, stream) = ExecutionStream::channel();
        for line in &self.script {
            tx.send(line.clone()).unwrap();
        }
        if self.keep_stream_open {
            self.open_streams.lock().unwrap().push(tx);
        }
        Ok(stream)
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::TerminalDisposed {
                terminal_id: self.id.clone(),
            });
        }
        self.sent_text.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn wait_for_exit(&self) {
        while self.never_exits && !self.is_disposed() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.open_streams.lock().unwrap().clear();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

type Factory = Box<dyn Fn() -> MockTerminal + Send + Sync>;

/// Host handing out mock terminals built by a factory
pub struct MockTerminalHost {
    factory: Factory,
    active: Mutex<Option<SharedTerminal>>,
    created: Mutex<Vec<Arc<MockTerminal>>>,
    fail_create: AtomicBool,
}

impl MockTerminalHost {
    pub fn new(factory: impl Fn() -> MockTerminal + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            active: Mutex::new(None),
            created: Mutex::new(Vec::new()),
            fail_create: AtomicBool::new(false),
        }
    }

    /// Host whose terminals answer every command with `lines`
    pub fn with_output(lines: &[&str]) -> Self {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        Self::new(move || MockTerminal::ready(lines.clone()))
    }

    /// Put `terminal` in place as the active terminal
    pub fn with_active(self, terminal: Arc<MockTerminal>) -> Self {
        *self.active.lock().unwrap() = Some(terminal);
        self
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Terminals created so far, oldest first
    pub fn created(&self) -> Vec<Arc<MockTerminal>> {
        self.created.lock().unwrap().clone()
    }

    pub fn active_id(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap()
            .as_ref()
            .map(|terminal| terminal.id().to_string())
    }
}

#[async_trait]
impl TerminalHost for MockTerminalHost {
    async fn active_terminal(&self) -> Option<SharedTerminal> {
        self.active
            .lock()
            .unwrap()
            .clone()
            .filter(|terminal| !terminal.is_disposed())
    }

    async fn create_terminal(&self) -> Result<SharedTerminal> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::PtyCreationFailed {
                shell: "/bin/mock".to_string(),
                reason: "no pty available".to_string(),
            });
        }
        let terminal = Arc::new((self.factory)());
        self.created.lock().unwrap().push(Arc::clone(&terminal));
        Ok(terminal)
    }

    async fn set_active(&self, terminal: SharedTerminal) {
        *self.active.lock().unwrap() = Some(terminal);
    }
}
