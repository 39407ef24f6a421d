mod commands;
mod menu;
mod settings;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{RunConfig, run_export_command, run_import_command};
use crate::menu::{Action, choose_action, wait_for_enter};
use crate::settings::TargetScript;

const DEFAULT_FILTER: &str = "paratranz_sync=info,paratranz_sync_cli=info";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory of the project
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Mapping file to use instead of the project's
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Script that marks text as translated
    #[arg(long, global = true, value_enum)]
    target_script: Option<TargetScript>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export translation items for every mapped table.
    Export,

    /// Import translation items into every translated table.
    Import,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(action: Action, args: Args) -> Result<(), String> {
    let config = RunConfig::resolve(
        args.project_dir,
        args.config,
        args.target_script.map(TargetScript::range),
    )?;
    match action {
        Action::Export => run_export_command(&config),
        Action::Import => run_import_command(&config),
    }
}

fn main() {
    let mut args = Args::parse();
    init_tracing();

    let (action, interactive) = match args.commands.take() {
        Some(Commands::Export) => (Some(Action::Export), false),
        Some(Commands::Import) => (Some(Action::Import), false),
        None => {
            let action = choose_action(io::stdin().lock(), io::stdout()).unwrap_or_else(|e| {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            });
            (action, true)
        }
    };

    let result = match action {
        Some(action) => run(action, args),
        None => Ok(()),
    };
    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }

    if interactive && let Err(e) = wait_for_enter(io::stdin().lock(), io::stdout()) {
        eprintln!("Error reading input: {}", e);
    }

    if result.is_err() {
        std::process::exit(1);
    }
}
