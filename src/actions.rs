//! User Actions
//!
//! One method per user-facing command. Each detects the package manager
//! afresh, builds the command, runs it through the execution driver and
//! records a telemetry event once the command has been dispatched.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::commands::{self, CommandBuilder};
use crate::config::Config;
use crate::detection::PackageManagerDetector;
use crate::error::{Error, Result};
use crate::execution::{ExecutionReport, ShellExecutionDriver, TerminalChoice};
use crate::models::{ComponentDescriptor, PackageManager};
use crate::registry::RegistryClient;
use crate::telemetry::{self, CommandEvent, TelemetrySink};
use crate::terminal::TerminalHost;

/// Telemetry command name for a registry reload
pub const RELOAD_EVENT: &str = "reload registry data";

/// Result of an install action
#[derive(Debug)]
pub enum ActionOutcome {
    /// The command ran
    Executed(ExecutionReport),
    /// Nothing was selected, so nothing ran
    NoSelection,
}

impl ActionOutcome {
    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            ActionOutcome::Executed(report) => Some(report),
            ActionOutcome::NoSelection => None,
        }
    }
}

/// The component installer's command surface
pub struct Actions {
    detector: PackageManagerDetector,
    builder: CommandBuilder,
    registry: RegistryClient,
    driver: ShellExecutionDriver,
    telemetry: Arc<dyn TelemetrySink>,
    docs_base_url: String,
}

impl Actions {
    pub fn new(
        detector: PackageManagerDetector,
        builder: CommandBuilder,
        registry: RegistryClient,
        driver: ShellExecutionDriver,
        telemetry: Arc<dyn TelemetrySink>,
        docs_base_url: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            builder,
            registry,
            driver,
            telemetry,
            docs_base_url: docs_base_url.into(),
        }
    }

    /// Wire everything from `config` for the project at `project_root`
    pub fn from_config(
        config: &Config,
        project_root: PathBuf,
        host: Arc<dyn TerminalHost>,
    ) -> Result<Self> {
        let builder = CommandBuilder::new(config.commands.runner.clone())
            .with_bun_force_runtime(config.commands.bun_force_runtime);

        Ok(Self::new(
            PackageManagerDetector::new(project_root),
            builder,
            RegistryClient::from_config(&config.registry)?,
            ShellExecutionDriver::from_config(host, &config.terminal),
            telemetry::from_config(&config.telemetry),
            config.docs.base_url.clone(),
        ))
    }

    /// Package manager of the project right now
    pub fn package_manager(&self) -> PackageManager {
        self.detector.detect()
    }

    /// Initialize the project for shadcn/ui
    pub async fn init_project(
        &self,
        choice: TerminalChoice,
        cancel: &CancellationToken,
    ) -> Result<ExecutionReport> {
        let manager = self.package_manager();
        let command = self.builder.build_init_command(manager);
        info!("Initializing project with {}", manager);

        let report = self.driver.run(&command, choice, cancel).await?;
        self.record(&command, manager);
        Ok(report)
    }

    /// Install one component
    pub async fn add_component(
        &self,
        component_id: &str,
        choice: TerminalChoice,
        cancel: &CancellationToken,
    ) -> Result<ActionOutcome> {
        self.add_components(std::slice::from_ref(&component_id), choice, cancel)
            .await
    }

    /// Install several components with a single command.
    ///
    /// An empty selection is a no-op, not an error.
    pub async fn add_components<S: AsRef<str>>(
        &self,
        component_ids: &[S],
        choice: TerminalChoice,
        cancel: &CancellationToken,
    ) -> Result<ActionOutcome> {
        let manager = self.package_manager();
        let command = match self.builder.build_install_command(manager, component_ids) {
            Ok(command) => command,
            Err(Error::EmptySelection) => {
                debug!("No components selected, nothing to install");
                return Ok(ActionOutcome::NoSelection);
            }
            Err(e) => return Err(e),
        };
        info!("Installing {} component(s) with {}", component_ids.len(), manager);

        let report = self.driver.run(&command, choice, cancel).await?;
        self.record(&command, manager);
        Ok(ActionOutcome::Executed(report))
    }

    /// Documentation page of one component
    pub fn component_doc_link(&self, component_id: &str) -> String {
        let link = commands::component_doc_link(&self.docs_base_url, component_id);
        self.record(&link, self.package_manager());
        link
    }

    /// Documentation root
    pub fn doc_url(&self) -> &str {
        self.record(&self.docs_base_url, self.package_manager());
        &self.docs_base_url
    }

    /// Refetch the component list, returning how many components it has.
    ///
    /// A failed refetch falls back to the list fetched earlier, if any.
    pub async fn reload_registry(&self) -> Result<usize> {
        let components = self.components(true).await?;
        info!("Reloaded {} components", components.len());
        self.record(RELOAD_EVENT, self.package_manager());
        Ok(components.len())
    }

    /// Components available for selection.
    ///
    /// Once a list has been fetched it stays usable: a failed refresh
    /// serves the stale list and only an empty cache surfaces the error.
    pub async fn list_components(&self, force_reload: bool) -> Result<Arc<Vec<ComponentDescriptor>>> {
        self.components(force_reload).await
    }

    /// Wait for commands that were sent without output capture to finish.
    ///
    /// Returns `false` if `cancel` fired first.
    pub async fn wait_for_detached(&self, cancel: &CancellationToken) -> bool {
        self.driver.wait_for_detached(cancel).await
    }

    /// Give pending telemetry up to `timeout` to be delivered
    pub async fn flush_telemetry(&self, timeout: Duration) {
        self.telemetry.flush(timeout).await;
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub fn driver(&self) -> &ShellExecutionDriver {
        &self.driver
    }

    async fn components(&self, force_reload: bool) -> Result<Arc<Vec<ComponentDescriptor>>> {
        match self.registry.get_registry(force_reload).await {
            Err(e @ Error::FetchFailed { .. }) => match self.registry.cached().await {
                Some(cached) => {
                    warn!("{}; using {} previously fetched components", e, cached.len());
                    Ok(cached)
                }
                None => Err(e),
            },
            result => result,
        }
    }

    fn record(&self, cmd: &str, manager: PackageManager) {
        self.telemetry.record(CommandEvent::new(cmd, manager));
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("project_root", &self.detector.project_root())
            .field("runner", &self.builder.runner())
            .field("docs_base_url", &self.docs_base_url)
            .finish_non_exhaustive()
    }
}
