//! Command generation
//!
//! Turns a package manager and a component selection into the literal
//! shell command that runs the component CLI.

use crate::error::{Error, Result};
use crate::models::PackageManager;

/// Builds `add` and `init` commands for the component CLI
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    /// Package spec handed to the runner, e.g. `shadcn@latest`
    runner: String,
    /// Run bunx with `--bun`
    bun_force_runtime: bool,
}

impl CommandBuilder {
    /// Create a builder for the given runner package
    pub fn new(runner: impl Into<String>) -> Self {
        Self {
            runner: runner.into(),
            bun_force_runtime: false,
        }
    }

    /// Make bun projects run the CLI on the bun runtime (`bunx --bun ...`)
    pub fn with_bun_force_runtime(mut self, enabled: bool) -> Self {
        self.bun_force_runtime = enabled;
        self
    }

    /// Runner package this builder targets
    pub fn runner(&self) -> &str {
        &self.runner
    }

    /// Build the install command for one or more components.
    ///
    /// Identifiers are joined with single spaces in the given order and are
    /// NOT shell-escaped; callers must pass identifiers without shell
    /// metacharacters (registry names always are).
    pub fn build_install_command<S: AsRef<str>>(
        &self,
        manager: PackageManager,
        component_ids: &[S],
    ) -> Result<String> {
        if component_ids.is_empty() {
            return Err(Error::EmptySelection);
        }

        let ids = component_ids
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");

        Ok(format!("{} add {}", self.invocation(manager), ids))
    }

    /// Build the project initialization command
    pub fn build_init_command(&self, manager: PackageManager) -> String {
        format!("{} init", self.invocation(manager))
    }

    /// `<runner prefix> <runner>` for the given manager
    fn invocation(&self, manager: PackageManager) -> String {
        if manager == PackageManager::Bun && self.bun_force_runtime {
            format!("{} --bun {}", manager.runner_prefix(), self.runner)
        } else {
            format!("{} {}", manager.runner_prefix(), self.runner)
        }
    }
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RUNNER)
    }
}

/// Documentation link for a single component
pub fn component_doc_link(docs_base_url: &str, component_id: &str) -> String {
    format!(
        "{}/components/{}",
        docs_base_url.trim_end_matches('/'),
        component_id
    )
}
