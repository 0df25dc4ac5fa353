//! Package manager detection
//!
//! Looks at the lockfiles in a project root to decide which package
//! manager drives it.

use crate::models::PackageManager;
use std::path::{Path, PathBuf};

/// Detects the package manager of a project from its lockfiles
#[derive(Debug, Clone)]
pub struct PackageManagerDetector {
    /// Directory holding the project's lockfiles
    project_root: PathBuf,
}

impl PackageManagerDetector {
    /// Create a detector for the given project root
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Create a detector for the current working directory
    pub fn current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Project root inspected by this detector
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Detect the package manager.
    ///
    /// Lockfiles are probed in priority order bun > pnpm > yarn and the first
    /// hit wins. Without any marker the answer is npm.
    pub fn detect(&self) -> PackageManager {
        for manager in PackageManager::DETECTION_ORDER {
            if manager
                .lockfiles()
                .iter()
                .any(|lockfile| self.marker_exists(lockfile))
            {
                debug!(
                    "Detected {} in {}",
                    manager,
                    self.project_root.display()
                );
                return manager;
            }
        }

        debug!(
            "No lockfile found in {}, defaulting to npm",
            self.project_root.display()
        );
        PackageManager::Npm
    }

    /// Existence probe; any error counts as "absent"
    fn marker_exists(&self, lockfile: &str) -> bool {
        let path = self.project_root.join(lockfile);
        match path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                trace!("Could not probe {}: {}", path.display(), e);
                false
            }
        }
    }
}
