//! Package Manager Definitions
//!
//! The package managers a JavaScript project can be driven with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package manager used to run the component CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm (also the fallback when no lockfile is found)
    #[default]
    Npm,
    /// pnpm
    Pnpm,
    /// Yarn
    Yarn,
    /// Bun
    Bun,
}

impl PackageManager {
    /// All package managers in detection priority order
    pub const DETECTION_ORDER: [PackageManager; 4] = [
        PackageManager::Bun,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Npm,
    ];

    /// Get a string representation of the package manager
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Lockfiles whose presence marks a project as using this manager.
    ///
    /// npm has none listed because it is the fallback.
    pub fn lockfiles(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Bun => &["bun.lockb", "bun.lock"],
            PackageManager::Pnpm => &["pnpm-lock.yaml"],
            PackageManager::Yarn => &["yarn.lock"],
            PackageManager::Npm => &[],
        }
    }

    /// The one-off package runner prefix (`npx`, `pnpm dlx`, `bunx`)
    pub fn runner_prefix(&self) -> &'static str {
        match self {
            PackageManager::Bun => "bunx",
            PackageManager::Pnpm => "pnpm dlx",
            PackageManager::Yarn | PackageManager::Npm => "npx",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
