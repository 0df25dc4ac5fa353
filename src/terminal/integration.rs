//! Shell Integration Markers
//!
//! A terminal only captures command output once the shell has proven it
//! can emit OSC 633 markers. The bootstrap line prints a `P` (property)
//! marker; each command is then bracketed by `C` (output start) and `D`
//! (finished, with exit status) markers.
//!
//! The shell echoes the typed command before running it, but the echo
//! carries `\033` as literal text. Only the real ESC bytes printed by
//! `printf` match the markers below.

use tokio::sync::mpsc::UnboundedSender;

use crate::models::ShellType;

/// Printed once the shell has run the bootstrap line
pub const READY_MARKER: &str = "\x1b]633;P;ShellIntegration=ready";

/// Printed right before the command starts writing output
pub const COMMAND_START: &str = "\x1b]633;C";

/// Printed after the command exits, followed by `;<status>`
pub const COMMAND_END: &str = "\x1b]633;D";

/// Line typed into a fresh shell to announce integration support.
///
/// `None` for shells that cannot run it.
pub fn bootstrap_command(shell: ShellType) -> Option<String> {
    if !shell.supports_shell_integration() {
        return None;
    }
    Some("printf '\\033]633;P;ShellIntegration=ready\\007\\n'".to_string())
}

/// Bracket `command` with start and end markers
pub fn wrap_command(command: &str, shell: ShellType) -> String {
    format!(
        "printf '\\033]633;C\\007'; {}; printf '\\033]633;D;%s\\007\\n' {}",
        command,
        shell.exit_status_expr()
    )
}

/// `command` followed by an exit of the shell running it
pub fn exit_after(command: &str, shell: ShellType) -> String {
    match shell {
        ShellType::Cmd => format!("{} & exit", command),
        _ => format!("{}; exit", command),
    }
}

/// What a routed line meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    /// The bootstrap marker arrived
    Ready,
    /// The start marker arrived with no output after it
    Started,
    /// The line went to the running command's stream
    Forwarded,
    /// The end marker arrived and the stream was closed
    Finished(Option<i32>),
    /// Prompt, echo or other output outside a command
    Ignored,
}

#[derive(Debug)]
struct Capture {
    tx: UnboundedSender<String>,
    started: bool,
}

/// Routes PTY output lines into readiness and per-command streams
#[derive(Debug, Default)]
pub struct MarkerRouter {
    ready: bool,
    capture: Option<Capture>,
}

impl MarkerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the bootstrap marker has been seen
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether a command's output is being captured
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Send lines of the next command to `tx`.
    ///
    /// Replaces a capture still in progress, which ends that stream.
    pub fn begin_capture(&mut self, tx: UnboundedSender<String>) {
        if self.capture.is_some() {
            debug!("Replacing unfinished output capture");
        }
        self.capture = Some(Capture { tx, started: false });
    }

    /// Stop capturing, closing the current stream
    pub fn end_capture(&mut self) {
        self.capture = None;
    }

    /// Route one output line
    pub fn route_line(&mut self, line: &str) -> RouteEvent {
        if !self.ready && line.contains(READY_MARKER) {
            self.ready = true;
            return RouteEvent::Ready;
        }

        let Some(capture) = self.capture.as_mut() else {
            return RouteEvent::Ignored;
        };

        let mut rest = line;
        let mut just_started = false;
        if !capture.started {
            match rest.find(COMMAND_START) {
                Some(start) => {
                    capture.started = true;
                    just_started = true;
                    let after = &rest[start + COMMAND_START.len()..];
                    rest = after.strip_prefix('\x07').unwrap_or(after);
                }
                None => return RouteEvent::Ignored,
            }
        }

        if let Some(end) = rest.find(COMMAND_END) {
            let before = &rest[..end];
            if !before.is_empty() {
                let _ = capture.tx.send(before.to_string());
            }
            let status = parse_exit_status(&rest[end + COMMAND_END.len()..]);
            self.capture = None;
            return RouteEvent::Finished(status);
        }

        if rest.is_empty() && just_started {
            return RouteEvent::Started;
        }

        // Consumer may have stopped listening; keep routing until the end marker
        let _ = capture.tx.send(rest.to_string());
        RouteEvent::Forwarded
    }
}

/// Parse `;<status>` following the end marker
fn parse_exit_status(tail: &str) -> Option<i32> {
    let digits: String = tail
        .strip_prefix(';')?
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}
