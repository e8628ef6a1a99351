//! Server binary for the Codepad playground
//!
//! Hosts the execution core behind HTTP/SSE so browser front ends can submit
//! runs and stream their canonical output. Configuration comes from an
//! optional YAML file overlaid with environment variables.

use anyhow::Result;
use clap::Parser;
use codepad_core::PlaygroundConfig;
use log::LevelFilter;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Codepad Server - serve the playground execution core")]
struct Cli {
    #[clap(
        long,
        short,
        default_value = "codepad.yaml",
        help = "Configuration file path; missing files fall back to environment-only configuration"
    )]
    config: String,

    #[clap(long, default_value = "127.0.0.1:3030")]
    bind_addr: String,

    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(long, help = "Stream simulated output chunk by chunk instead of in one piece")]
    stream: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let mut config = PlaygroundConfig::resolve(Some(&cli.config))?;
    if cli.stream {
        config.simulator.streaming = true;
    }
    log::info!(
        "Configuration loaded (remote judge: {}, streaming simulation: {})",
        if config.has_remote() { "enabled" } else { "disabled" },
        config.simulator.streaming
    );

    let bind_addr: SocketAddr = cli
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cli.bind_addr, e))?;

    codepad_server::serve(config, bind_addr).await?;
    Ok(())
}
