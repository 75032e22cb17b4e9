//! kubesh binary entrypoint.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kubesh::backend::{Backend, Kubectl};
use kubesh::shell::{EditorSession, Shell};
use kubesh::{Cli, ShellConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ShellConfig::load(cli.config.as_deref()).and_then(|c| c.with_overrides(&cli))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // KUBESH_LOG wins over the configured level
    let filter = EnvFilter::try_from_env("KUBESH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ShellConfig) -> anyhow::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(Kubectl::new(config.kubectl.clone()));
    let mut shell = Shell::new(backend, config, io::stdout());
    shell.print_banner()?;

    let mut editor = EditorSession::open(shell.completion_engine(), config.history_file.clone())
        .context("failed to open line editor")?;
    tracing::debug!(kubectl = %config.kubectl.display(), "shell started");
    shell.run(&mut editor)?;
    Ok(())
}
