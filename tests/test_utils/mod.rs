//! Test Utilities and Mocks
//!
//! Shared by the integration test targets through `#[path]` modules.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_terminal;

pub use fixtures::{registry_payload, StaticSource};
pub use mock_terminal::{MockTerminal, MockTerminalHost};
