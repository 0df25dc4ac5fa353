//! Shell Type Definitions
//!
//! Which shell a terminal runs decides whether it can speak the
//! shell-integration protocol and how the last exit status is spelled.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Type of shell being used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShellType {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Fish Shell
    Fish,
    /// POSIX sh
    #[default]
    Sh,
    /// Dash
    Dash,
    /// Korn Shell
    Ksh,
    /// PowerShell
    PowerShell,
    /// Command Prompt
    Cmd,
    /// Other/Unknown shell
    Other,
}

impl ShellType {
    /// Get a string representation of the shell type
    pub fn as_str(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
            ShellType::Sh => "sh",
            ShellType::Dash => "dash",
            ShellType::Ksh => "ksh",
            ShellType::PowerShell => "powershell",
            ShellType::Cmd => "cmd",
            ShellType::Other => "other",
        }
    }

    /// Get shell type from string (case-insensitive)
    pub fn from_string(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "sh" => ShellType::Sh,
            "dash" => ShellType::Dash,
            "ksh" | "mksh" => ShellType::Ksh,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Other,
        }
    }

    /// Infer the shell type from an executable path such as `/usr/bin/zsh`
    pub fn from_path(path: &Path) -> Self {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(Self::from_string)
            .unwrap_or(ShellType::Other)
    }

    /// Whether the shell understands the `printf` based marker protocol
    pub fn supports_shell_integration(&self) -> bool {
        matches!(
            self,
            ShellType::Bash
                | ShellType::Zsh
                | ShellType::Fish
                | ShellType::Sh
                | ShellType::Dash
                | ShellType::Ksh
        )
    }

    /// Expression expanding to the exit status of the previous command
    pub fn exit_status_expr(&self) -> &'static str {
        match self {
            ShellType::Fish => "$status",
            _ => "$?",
        }
    }
}
