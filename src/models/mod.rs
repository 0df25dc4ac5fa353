//! Core data models for shadcn-term
//!
//! Domain entities shared across the crate: package managers, registry
//! components, shells and terminal sessions.

pub mod component;
pub mod package_manager;
pub mod shell_type;
pub mod terminal_session;

// Re-exports for convenience
pub use component::{ComponentDescriptor, RawComponent};
pub use package_manager::PackageManager;
pub use shell_type::ShellType;
pub use terminal_session::{SessionState, TerminalSession};
