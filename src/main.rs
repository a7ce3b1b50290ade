//
//  redmine-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use redmine_cli::cli::{Cli, Commands};
use redmine_cli::{exit_codes, ApiError};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<ApiError>()
                .map(ApiError::exit_code)
                .unwrap_or(exit_codes::ERROR);
            std::process::exit(code);
        }
    }
}

/// Logs go to stderr so stdout stays reserved for command output and the
/// tool protocol.
fn init_logging() {
    let filter = EnvFilter::try_from_env("REDMINE_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Project(cmd) => cmd.run(&cli.global).await,
        Commands::Issue(cmd) => cmd.run(&cli.global).await,
        Commands::Meta(cmd) => cmd.run(&cli.global).await,
        Commands::User(cmd) => cmd.run(&cli.global).await,
        Commands::File(cmd) => cmd.run(&cli.global).await,
        Commands::Tools(cmd) => cmd.run(&cli.global).await,
        Commands::Serve(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("{} version {}", redmine_cli::APP_NAME, redmine_cli::VERSION);
            Ok(())
        }
    }
}
