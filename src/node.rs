use crate::blockchain::{Block, LedgerStore};
use crate::config::Config;
use crate::error::ChainError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Booting,
    Ready,
    Stopping,
}

/// Process-level orchestrator: owns the one ledger for this process and
/// hands it to the API layer.
pub struct Node {
    pub config: Config,
    pub ledger: Arc<LedgerStore>,
    pub state: Arc<RwLock<NodeState>>,
}

impl Node {
    pub fn init(config: Config) -> Result<Self, ChainError> {
        config.validate()?;
        let ledger = Arc::new(LedgerStore::new());
        info!(
            "Starting ReceiptChain node on {}:{}",
            config.network.bind_address, config.network.api_port
        );
        log_chain(&ledger.snapshot());

        Ok(Self {
            config,
            ledger,
            state: Arc::new(RwLock::new(NodeState::Booting)),
        })
    }

    /// Install the global tracing subscriber at the configured level.
    pub fn init_tracing(config: &Config) -> Result<(), ChainError> {
        let level = config.log_level()?;
        // A subscriber installed earlier (tests, embedding binaries) wins.
        let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
        Ok(())
    }

    #[cfg(feature = "api")]
    pub async fn start(self: Arc<Self>) -> Result<(), ChainError> {
        let addr = self.config.socket_addr()?;
        let api_node = Arc::new(crate::api::Node::new_shared(
            self.ledger.clone(),
            Some(self.state.clone()),
        ));

        *self.state.write().await = NodeState::Ready;
        let result = crate::api::run_api_server(api_node, addr).await;
        *self.state.write().await = NodeState::Stopping;

        info!("Node stopped with {} block(s) in memory", self.ledger.len());
        result
    }
}

/// Write every block to the log: previous hash, payload, hash.
pub fn log_chain(blocks: &[Block]) {
    for block in blocks {
        let payload = serde_json::to_string_pretty(&block.payload).unwrap_or_default();
        info!(
            position = block.position,
            previous_hash = %block.previous_hash,
            hash = %block.hash,
            "Data: {}",
            payload
        );
    }
}
