//
//  deployer-client
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deployer_client::cli::{Cli, Commands};
use deployer_client::{exit_codes, DeployerError};

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
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("DEPLOYER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Exit code for a failed command
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<DeployerError>() {
        Some(DeployerError::InvalidArgument(_)) => exit_codes::USAGE,
        Some(DeployerError::Authentication { .. }) => exit_codes::AUTH_ERROR,
        Some(DeployerError::Config(_)) => exit_codes::CONFIG_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Org(cmd) => cmd.run(&cli.global).await,
        Commands::Project(cmd) => cmd.run(&cli.global).await,
        Commands::Target(cmd) => cmd.run(&cli.global).await,
        Commands::Link(cmd) => cmd.run(&cli.global).await,
        Commands::Recipe(cmd) => cmd.run(&cli.global).await,
        Commands::Wizard(cmd) => cmd.run(&cli.global).await,
        Commands::Api(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("{} version {}", deployer_client::APP_NAME, deployer_client::VERSION);
            Ok(())
        }
    }
}
