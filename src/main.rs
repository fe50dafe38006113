use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing::debug;

use vetdesk::adapters::cli::{Cli, run};
use vetdesk::infra::{
    config::AppConfig,
    setup::{init_app_state, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_base_url = url;
    }
    if let Some(path) = cli.session_file.clone() {
        config.session_file = path;
    }

    init_tracing(config.log_file.as_deref(), cli.verbose)?;
    let mut state = init_app_state(config)?;

    let mut stdout = std::io::stdout().lock();
    match run(cli.command, cli.format, &mut state, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            debug!(error = ?e, "Command failed");
            stdout.flush()?;
            eprintln!("error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
