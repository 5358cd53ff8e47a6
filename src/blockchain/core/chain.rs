use crate::crypto::sha256_hex;
use crate::receipt::Receipt;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One committed unit of the ledger.
///
/// Serialized with the field names the node has always exposed on `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub position: i64,
    #[serde(rename = "Data")]
    pub payload: Receipt,
    pub timestamp: String,
    pub hash: String,
    #[serde(rename = "PreHash")]
    pub previous_hash: String,
}

impl Block {
    /// Build a candidate block on top of `predecessor`, stamped with the
    /// current time.
    pub fn construct(predecessor: &Block, payload: Receipt) -> Self {
        Self::construct_at(predecessor, payload, current_timestamp())
    }

    /// Like [`Block::construct`] but with a caller-supplied timestamp.
    pub fn construct_at(predecessor: &Block, payload: Receipt, timestamp: String) -> Self {
        let mut block = Block {
            position: predecessor.position + 1,
            payload,
            timestamp,
            hash: String::new(),
            previous_hash: predecessor.hash.clone(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Block 0. Built through the same path as every other block, against a
    /// zero-valued predecessor at position -1.
    pub fn genesis() -> Self {
        Self::construct(&Self::origin(), Receipt::genesis())
    }

    fn origin() -> Self {
        Block {
            position: -1,
            payload: Receipt::default(),
            timestamp: String::new(),
            hash: String::new(),
            previous_hash: String::new(),
        }
    }

    /// SHA-256 over decimal position, timestamp, payload JSON and previous
    /// hash, in that order.
    pub fn compute_hash(&self) -> String {
        let position = self.position.to_string();
        let payload = self.payload.canonical_bytes();
        sha256_hex(&[
            position.as_bytes(),
            self.timestamp.as_bytes(),
            &payload,
            self.previous_hash.as_bytes(),
        ])
    }

    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.position == 0 && self.previous_hash.is_empty() && self.payload.is_genesis
    }
}

/// RFC 3339 UTC with nanoseconds.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}
