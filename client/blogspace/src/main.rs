use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use blogspace::cli::{self, Cli};
use blogspace::telemetry::init_tracing;
use blogspace::{App, Config};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config.log);
    tracing::debug!(
        auth = %config.api.auth_base_url,
        blog = %config.api.blog_base_url,
        "Configuration loaded"
    );

    let app = App::new(config);
    let mut stdout = std::io::stdout().lock();
    let ok = cli::execute(cli.command, &app, &mut stdout).await?;
    stdout.flush()?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
