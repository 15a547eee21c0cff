//
//  bitbucket-v1
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_v1::cli::{Cli, Commands};
use bitbucket_v1::exit_codes;
use bitbucket_v1::output::OutputWriter;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let writer = cli.global.writer();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            debug!(error = ?e, "command failed");
            report(&writer, &e);
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging from `BBV1_LOG` (defaults to warnings only)
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBV1_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn report(writer: &OutputWriter, err: &anyhow::Error) {
    writer.write_error(&format!("{err:#}"));
    if exit_codes::for_error(err) == exit_codes::AUTH_ERROR {
        writer.write_warning("Run 'bbv1 auth login' to authenticate.");
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::User(cmd) => cmd.run(&cli.global).await,
        Commands::Repo(cmd) => cmd.run(&cli.global).await,
        Commands::Issue(cmd) => cmd.run(&cli.global).await,
        Commands::Comment(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bbv1 version {}", bitbucket_v1::VERSION);
            Ok(())
        }
    }
}
