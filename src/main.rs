mod artifact;
mod catalog;
mod cli;
mod config;
mod error;
mod job;
mod kie;
mod mcp;
mod media;
mod orchestrator;
mod poller;
mod tools;
mod transcribe;
mod ui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::MediaConfig;
use orchestrator::{Orchestrator, download_client, http_client};
use ui::CallProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Command::Tools = cli.command {
        let definitions = mcp::tool_definitions();
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    let config = MediaConfig::load(cli.config.as_deref())?;
    let http = http_client().context("failed to build HTTP client")?;
    let downloads = download_client().context("failed to build download client")?;
    let orch = Orchestrator::new(config, http).with_downloads(downloads);

    match cli.command {
        Command::Serve => mcp::serve_stdio(&orch).await,
        Command::Call { tool, args, json } => {
            let args: Value = serde_json::from_str(&args).context("--args must be valid JSON")?;
            if !args.is_object() {
                bail!("--args must be a JSON object");
            }

            let progress = CallProgress::start(&tool);
            let result = tools::dispatch(&orch, &tool, &args).await;
            if progress.finish(&tool, &result, json) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Tools => Ok(()),
    }
}

/// Logs go to stderr; stdout belongs to the protocol (or to `call` output).
fn init_tracing(cli: &Cli) {
    let fallback = match cli.command {
        Command::Serve => "info",
        _ => "warn",
    };
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
