// ABOUTME: Entry point for the kubeb CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use kubeb::error::Result;
use kubeb::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli.command, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Commands, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    match command {
        Commands::Init(args) => commands::init(args, output),
        Commands::Info => commands::info(output),
        Commands::Build { message, push } => commands::build(message, push, output).await,
        Commands::Push { version } => commands::push(version, output).await,
        Commands::Deploy {
            version,
            previous,
            set,
            dry_run,
            no_rollback,
        } => commands::deploy(version, previous, set, dry_run, no_rollback, output).await,
        Commands::Rollback { revision } => commands::rollback(revision, output).await,
        Commands::Delete { yes } => commands::delete(yes, output).await,
        Commands::Version => commands::versions(output),
        Commands::History => commands::history(output).await,
        Commands::Env { name } => commands::env(name, output),
        Commands::Setenv { assignments } => commands::setenv(assignments, output),
        Commands::Template { name, path, force } => {
            commands::template(name, path, force, output)
        }
        Commands::Destroy { yes } => commands::destroy(yes, output),
    }
}
