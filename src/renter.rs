//! Renter records minted by `POST /new`. These never touch the ledger.

use serde::{Deserialize, Serialize};

use crate::crypto::digest_str;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Renter {
    pub id: String,
    pub name: String,
    pub join_date: String,
}

impl Renter {
    /// Derive the renter ID from the join date.
    pub fn assign_id(&mut self) {
        self.id = digest_str(&self.join_date);
    }
}
