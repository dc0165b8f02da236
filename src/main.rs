mod asset;
mod cli;
mod commands;
mod config;
mod paths;
mod resources;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Settings;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let endpoint_flag = cli.endpoint.clone();
    let stack_flag = cli.stack.clone();

    match cli.command {
        Command::PrepareAsset => {
            let settings = Settings::resolve(endpoint_flag, stack_flag)?;
            commands::asset::prepare(&ctx, &settings)
        }
        Command::CleanupAsset => {
            let settings = Settings::resolve(endpoint_flag, stack_flag)?;
            commands::asset::cleanup(&ctx, &settings)
        }
        Command::ServiceEndpoint => {
            let settings = Settings::resolve(endpoint_flag, stack_flag)?;
            commands::service::endpoint(&ctx, &settings)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "nw-builder", &mut io::stdout());
            Ok(())
        }
    }
}
