//! worktrack - task timers for small teams
//!
//! Employees log daily tasks and time them with start/pause/finish;
//! only one timer per person runs at a time. Admins see team totals,
//! who is working right now, and can export everything as CSV.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use worktrack::cli::{App, Cli, Commands, Display, TimerAction};
use worktrack::{Config, TrackError};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        match e.downcast_ref::<TrackError>() {
            Some(track) => Display::show_track_error(track),
            None => Display::show_error(&format!("{e:#}")),
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let app = App::new(config, cli.data, cli.as_user);

    match command {
        Commands::Seed { force } => app.seed(force).await?,
        Commands::Add(args) => app.add(args).await?,
        Commands::List(args) => app.list(&args.filter).await?,
        Commands::Start(t) => app.timer(TimerAction::Start, &t.task).await?,
        Commands::Pause(t) => app.timer(TimerAction::Pause, &t.task).await?,
        Commands::Finish(t) => app.timer(TimerAction::Finish, &t.task).await?,
        Commands::Edit(args) => app.edit(args).await?,
        Commands::Delete(t) => app.delete(&t.task).await?,
        Commands::Status => app.status().await?,
        Commands::Summary(args) => app.summary(args.date).await?,
        Commands::Team => app.team().await?,
        Commands::Export(args) => app.export(&args).await?,
        Commands::Employees { action } => app.employees(action).await?,
        Commands::Watch(args) => app.watch(&args).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
