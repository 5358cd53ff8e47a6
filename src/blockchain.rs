// Thin re-export module: implementation lives under `blockchain/core/` split
// by responsibility (block construction, validation, the ledger store).

pub mod core;
pub use core::*;
