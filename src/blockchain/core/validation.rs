use crate::error::ChainError;
use thiserror::Error;

use super::chain::Block;

/// Why a candidate block was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("previous hash mismatch: expected {expected}, got {found}")]
    BrokenLinkage { expected: String, found: String },
    #[error("block hash does not match its contents: stored {stored}, computed {computed}")]
    DigestMismatch { stored: String, computed: String },
    #[error("position gap: expected {expected}, got {found}")]
    PositionGap { expected: i64, found: i64 },
}

/// Gate every append: linkage, digest, then position continuity.
pub fn check_acceptance(candidate: &Block, predecessor: &Block) -> Result<(), Rejection> {
    if candidate.previous_hash != predecessor.hash {
        return Err(Rejection::BrokenLinkage {
            expected: predecessor.hash.clone(),
            found: candidate.previous_hash.clone(),
        });
    }

    let computed = candidate.compute_hash();
    if computed != candidate.hash {
        return Err(Rejection::DigestMismatch {
            stored: candidate.hash.clone(),
            computed,
        });
    }

    if candidate.position != predecessor.position + 1 {
        return Err(Rejection::PositionGap {
            expected: predecessor.position + 1,
            found: candidate.position,
        });
    }

    Ok(())
}

pub fn is_acceptable(candidate: &Block, predecessor: &Block) -> bool {
    check_acceptance(candidate, predecessor).is_ok()
}

/// Verify an entire chain from genesis forward.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or_else(|| ChainError::InvalidChain {
        position: 0,
        reason: "chain has no genesis block".to_string(),
    })?;

    if !genesis.is_genesis() {
        return Err(ChainError::InvalidChain {
            position: genesis.position,
            reason: "first block is not a genesis block".to_string(),
        });
    }
    if !genesis.has_valid_hash() {
        return Err(ChainError::InvalidChain {
            position: 0,
            reason: "genesis hash does not match its contents".to_string(),
        });
    }

    for pair in blocks.windows(2) {
        check_acceptance(&pair[1], &pair[0]).map_err(|rejection| ChainError::InvalidChain {
            position: pair[1].position,
            reason: rejection.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::Receipt;

    fn sample_chain(len: usize) -> Vec<Block> {
        let mut blocks = vec![Block::genesis()];
        for i in 1..len {
            let prev = &blocks[i - 1];
            let next = Block::construct(prev, Receipt::new(format!("renter-{i}"), "2024-01"));
            blocks.push(next);
        }
        blocks
    }

    #[test]
    fn test_honest_candidate_is_accepted() {
        let chain = sample_chain(2);
        assert_eq!(check_acceptance(&chain[1], &chain[0]), Ok(()));
        assert!(is_acceptable(&chain[1], &chain[0]));
    }

    #[test]
    fn test_wrong_predecessor_breaks_linkage() {
        let chain = sample_chain(3);
        let err = check_acceptance(&chain[2], &chain[0]).unwrap_err();
        assert!(matches!(err, Rejection::BrokenLinkage { .. }));
    }

    #[test]
    fn test_tampered_payload_fails_digest() {
        let chain = sample_chain(2);
        let mut forged = chain[1].clone();
        forged.payload.renter = "mallory".to_string();
        let err = check_acceptance(&forged, &chain[0]).unwrap_err();
        assert!(matches!(err, Rejection::DigestMismatch { .. }));
    }

    #[test]
    fn test_resealed_position_jump_is_a_gap() {
        let chain = sample_chain(2);
        let mut jumped = chain[1].clone();
        jumped.position = 5;
        jumped.hash = jumped.compute_hash();
        assert_eq!(
            check_acceptance(&jumped, &chain[0]),
            Err(Rejection::PositionGap {
                expected: 1,
                found: 5
            })
        );
    }

    #[test]
    fn test_validate_chain() {
        let chain = sample_chain(5);
        assert!(validate_chain(&chain).is_ok());
        assert!(validate_chain(&[]).is_err());
    }

    #[test]
    fn test_validate_chain_reports_tampered_position() {
        let mut chain = sample_chain(4);
        chain[2].payload.pay_date = "1999-12".to_string();
        match validate_chain(&chain) {
            Err(ChainError::InvalidChain { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected invalid chain, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_chain_requires_genesis_first() {
        let chain = sample_chain(3);
        assert!(validate_chain(&chain[1..]).is_err());

        let mut forged = chain.clone();
        forged[0].payload.is_genesis = false;
        assert!(validate_chain(&forged).is_err());
    }
}
