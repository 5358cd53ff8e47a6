use crate::error::ChainError;
use crate::receipt::Receipt;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::chain::Block;
use super::validation::{check_acceptance, validate_chain, Rejection};

/// Result of an append attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Committed(Block),
    Rejected(Rejection),
}

impl AppendOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, AppendOutcome::Committed(_))
    }
}

/// Owns the block sequence and gatekeeps every append.
///
/// The write lock is held across read-tip, construct, check and push, so two
/// concurrent appends can never build on the same predecessor.
pub struct LedgerStore {
    blocks: RwLock<Vec<Block>>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore {
    /// A ledger holding only the genesis block.
    pub fn new() -> Self {
        let genesis = Block::genesis();
        debug!(hash = %genesis.hash, "ledger.genesis");
        Self {
            blocks: RwLock::new(vec![genesis]),
        }
    }

    pub fn append(&self, payload: Receipt) -> AppendOutcome {
        let mut blocks = self.blocks.write();
        let candidate = Block::construct(last(&blocks), payload);
        Self::commit(&mut blocks, candidate)
    }

    /// Offer an externally built block for the tip of the chain.
    pub fn submit(&self, candidate: Block) -> AppendOutcome {
        let mut blocks = self.blocks.write();
        Self::commit(&mut blocks, candidate)
    }

    fn commit(blocks: &mut Vec<Block>, candidate: Block) -> AppendOutcome {
        match check_acceptance(&candidate, last(blocks)) {
            Ok(()) => {
                debug!(
                    position = candidate.position,
                    hash = %candidate.hash,
                    "ledger.commit"
                );
                blocks.push(candidate.clone());
                AppendOutcome::Committed(candidate)
            }
            Err(rejection) => {
                warn!(
                    position = candidate.position,
                    reason = %rejection,
                    "ledger.reject"
                );
                AppendOutcome::Rejected(rejection)
            }
        }
    }

    /// A copy of the full chain; the internal sequence is never exposed.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Always false: genesis is created at construction and never removed.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    pub fn tip(&self) -> Block {
        last(&self.blocks.read()).clone()
    }

    pub fn get(&self, position: i64) -> Option<Block> {
        let index = usize::try_from(position).ok()?;
        self.blocks.read().get(index).cloned()
    }

    pub fn verify(&self) -> Result<(), ChainError> {
        validate_chain(&self.blocks.read())
    }
}

// `new` seeds the genesis block and nothing ever removes it.
fn last(blocks: &[Block]) -> &Block {
    &blocks[blocks.len() - 1]
}
