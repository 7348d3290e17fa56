//! zonecal CLI entry point.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zonecal_cli::cli::{Cli, Mode};
use zonecal_cli::{Config, Session};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zonecal=info,zonecal_cli=info,zonecal_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.calendar, cli.timezone)?;
    tracing::debug!(?config, "Loaded configuration");

    let mut session = Session::new(config.registry(), cli.format);
    let mut stdout = io::stdout().lock();

    match cli.mode {
        Mode::Interactive => {
            tracing::info!(calendar = %config.default_calendar, "Starting interactive mode");
            session.run_interactive(io::stdin().lock(), &mut stdout)?;
            tracing::info!("Interactive mode ended");
        }
        Mode::Headless { file } => {
            let script = File::open(&file)
                .with_context(|| format!("Cannot read script {}", file.display()))?;

            tracing::info!(script = %file.display(), "Running script");
            let count = session.run_headless(BufReader::new(script), &mut stdout)?;
            tracing::info!(commands = count, "Script finished");
        }
    }

    Ok(())
}
