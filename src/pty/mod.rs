//! Pseudoterminal (PTY) Backend
//!
//! Production [`Terminal`](crate::terminal::Terminal) implementation:
//! shells spawned with portable-pty, bridged to tokio through blocking
//! reader/writer threads.

pub mod host;
pub mod process;
pub mod streams;
pub mod terminal;

pub use host::PtyTerminalHost;
pub use process::{get_user_shell, spawn_shell, SpawnedShell, FALLBACK_SHELL};
pub use streams::PtyStreams;
pub use terminal::PtyTerminal;
