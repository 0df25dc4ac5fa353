//! shadcn-term command-line entry point

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use shadcn_term::execution::ExecutionModeKind;
use shadcn_term::{
    handle_startup_error, load_config, ActionOutcome, Actions, Config, ExecutionReport,
    PackageManagerDetector, PtyTerminalHost, TerminalChoice,
};

/// Discover shadcn/ui components and install them with your project's package manager
#[derive(Parser, Debug)]
#[command(
    name = "shadcn-term",
    author,
    version,
    about = "Discover shadcn/ui components and install them through a shell session",
    after_help = "EXAMPLES:\n    \
                  shadcn-term init\n    \
                  shadcn-term add button card\n    \
                  shadcn-term list --reload\n    \
                  shadcn-term docs accordion"
)]
struct Cli {
    /// Configuration file (defaults to the standard search paths)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Project directory (defaults to current directory)
    #[arg(long = "project", short = 'C', global = true)]
    project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the project for shadcn/ui
    Init {
        /// Run in the active terminal instead of a fresh one
        #[arg(long)]
        reuse_terminal: bool,
    },

    /// Install one or more components
    Add {
        /// Component names, e.g. `button card`
        #[arg(required = true)]
        components: Vec<String>,

        /// Run in the active terminal instead of a fresh one
        #[arg(long)]
        reuse_terminal: bool,

        /// Print the execution report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available components
    List {
        /// Bypass the cache and refetch the registry
        #[arg(long)]
        reload: bool,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the documentation URL, or a component's page
    Docs {
        /// Component name
        component: Option<String>,
    },

    /// Refetch the component registry
    Reload,

    /// Print the detected package manager
    Detect,
}

/// Upper bound on delivering telemetry before the process exits
const TELEMETRY_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn terminal_choice(config: &Config, reuse_terminal: bool) -> TerminalChoice {
    if reuse_terminal {
        TerminalChoice::Reuse
    } else {
        TerminalChoice::from_new_terminal(config.terminal.new_terminal)
    }
}

fn print_report(report: &ExecutionReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialize report")?
        );
        return Ok(());
    }

    for line in &report.output {
        println!("{}", line);
    }
    if report.mode == ExecutionModeKind::FireAndForget {
        eprintln!(
            "Shell integration unavailable: '{}' was sent to the terminal without capturing output",
            report.command
        );
    }
    if report.cancelled {
        eprintln!("Cancelled; the command may still be running");
    }
    Ok(())
}

/// Trip `cancel` on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("Interrupt received");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}

/// Keep the process, and with it the shell, alive until an uncaptured command ends
async fn wait_for_detached(actions: &Actions, cancel: &CancellationToken) {
    if !actions.driver().has_detached() {
        return;
    }

    eprintln!("Waiting for the command to finish (Ctrl-C stops it)...");
    if !actions.wait_for_detached(cancel).await {
        eprintln!("Stopped before the command finished");
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let project = match cli.project {
        Some(dir) => dir,
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    debug!("Project root: {}", project.display());

    if let Commands::Detect = cli.command {
        println!("{}", PackageManagerDetector::new(project).detect());
        return Ok(());
    }

    let host = Arc::new(PtyTerminalHost::from_config(&config.terminal, project.clone()));
    let actions = Actions::from_config(&config, project, host)?;
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match cli.command {
        Commands::Init { reuse_terminal } => {
            let report = actions
                .init_project(terminal_choice(&config, reuse_terminal), &cancel)
                .await?;
            print_report(&report, false)?;
            wait_for_detached(&actions, &cancel).await;
        }
        Commands::Add {
            components,
            reuse_terminal,
            json,
        } => {
            let outcome = actions
                .add_components(components.as_slice(), terminal_choice(&config, reuse_terminal), &cancel)
                .await?;
            match outcome {
                ActionOutcome::Executed(report) => {
                    print_report(&report, json)?;
                    wait_for_detached(&actions, &cancel).await;
                }
                ActionOutcome::NoSelection => eprintln!("No components selected"),
            }
        }
        Commands::List { reload, json } => {
            let components = actions.list_components(reload).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(components.as_slice())?);
            } else {
                let width = components
                    .iter()
                    .map(|c| c.identifier().len())
                    .max()
                    .unwrap_or(0);
                for component in components.iter() {
                    println!(
                        "{:<width$}  {}",
                        component.identifier(),
                        component.display_detail(),
                        width = width
                    );
                }
            }
        }
        Commands::Docs { component } => match component {
            Some(id) => println!("{}", actions.component_doc_link(&id)),
            None => println!("{}", actions.doc_url()),
        },
        Commands::Reload => {
            let count = actions.reload_registry().await?;
            println!("shadcn/ui: Reloaded {} components", count);
        }
        Commands::Detect => {}
    }

    actions.flush_telemetry(TELEMETRY_FLUSH_TIMEOUT).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<shadcn_term::Error>() {
            Some(error) => eprintln!("{}", handle_startup_error(error)),
            None => eprintln!("Error: {:#}", e),
        }
        process::exit(1);
    }
}
