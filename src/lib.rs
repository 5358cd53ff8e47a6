//! ReceiptChain - a single-node, append-only ledger of rent receipts
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`blockchain`] - Block construction, acceptance checks and the ledger store
//! - [`receipt`] - Receipt payloads and receipt ID minting
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 hex digests
//!
//! ## Integration
//! - `api` - HTTP endpoints (feature `api`)
//! - [`node`] - Startup orchestration
//! - [`renter`] - Renter ID minting
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod receipt;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;
pub mod node;
pub mod renter;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
