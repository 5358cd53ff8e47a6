#![forbid(unsafe_code)]
//! ReceiptChain node: serves the in-memory receipt ledger over HTTP.

use clap::Parser;
use receiptchain::config::{load_config_from, DEFAULT_CONFIG_PATH};
use receiptchain::node::Node;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "receipt-node", version, about = "Run a ReceiptChain node")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the API port (takes precedence over PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config_from(&cli.config)?;
    config.apply_env();
    if let Some(port) = cli.port {
        config.network.api_port = port;
    }

    Node::init_tracing(&config)?;
    let node = Arc::new(Node::init(config)?);
    node.start().await?;

    Ok(())
}
