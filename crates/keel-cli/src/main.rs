//! Keel CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keel_cli::cli::{Cli, Commands};
use keel_cli::commands::{stored_logs_factory, CatCommand, CleanupCommand, WriteCommand};
use keel_cli::{CliError, OutputFormat};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.logs_config()?;
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Write(args) => {
            let factory = config.logger_factory();
            let cmd = WriteCommand::new(&*factory);
            cmd.execute(io::stdin().lock(), &mut stdout, &format, args)?;
        }
        Commands::Cat(args) => {
            let factory = stored_logs_factory(&config, "cat");
            CatCommand::new(&factory).execute(&mut stdout, &format, args)?;
        }
        Commands::Cleanup(args) => {
            let factory = stored_logs_factory(&config, "cleanup");
            CleanupCommand::new(&factory).execute(&mut stdout, &format, args)?;
        }
    }

    Ok(())
}
