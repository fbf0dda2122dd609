/*
[INPUT]:  CLI arguments, optional YAML configuration file, CEX_REST_* environment
[OUTPUT]: Exchange response printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cex_rest_cli::{CliConfig, Command, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "cex-rest", version, about = "Query Apex, Bybit and KuCoin REST APIs")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = ?args.config_path.as_ref().map(|p| p.display().to_string()),
        "starting cex-rest"
    );

    let config = CliConfig::load(args.config_path.as_deref()).context("load config")?;
    let value = cex_rest_cli::run(args.command, &config)
        .await
        .context("exchange request failed")?;

    println!("{}", args.output.render(&value)?);
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
