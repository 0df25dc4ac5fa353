//! Scoped terminal ownership for one execution

use crate::terminal::SharedTerminal;

/// A terminal borrowed for one execution.
///
/// An owned terminal is disposed on [`TerminalLease::release`], or on drop
/// if release never ran.
pub struct TerminalLease {
    terminal: SharedTerminal,
    owned: bool,
    released: bool,
}

impl TerminalLease {
    /// Lease a terminal the execution created and must dispose
    pub fn owned(terminal: SharedTerminal) -> Self {
        Self {
            terminal,
            owned: true,
            released: false,
        }
    }

    /// Lease a terminal that belongs to the host
    pub fn borrowed(terminal: SharedTerminal) -> Self {
        Self {
            terminal,
            owned: false,
            released: false,
        }
    }

    pub fn terminal(&self) -> &SharedTerminal {
        &self.terminal
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Give up ownership; the terminal will not be disposed by this lease
    pub fn hand_off(&mut self) -> SharedTerminal {
        self.owned = false;
        self.terminal.clone()
    }

    /// End the lease. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if self.owned {
            debug!("Disposing terminal {}", self.terminal.id());
            self.terminal.dispose();
        }
    }
}

impl Drop for TerminalLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for TerminalLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalLease")
            .field("terminal", &self.terminal.id())
            .field("owned", &self.owned)
            .field("released", &self.released)
            .finish()
    }
}
