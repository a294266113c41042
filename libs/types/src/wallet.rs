//! Wallet balances and their primitive mutations.
//!
//! A wallet holds two integer buckets per asset: `available` (spendable) and
//! `reserved` (held against open commitments). Every mutation goes through
//! the primitives here; debits refuse to drive a bucket negative, so the
//! non-negativity invariant holds by construction. `BTreeMap` keeps asset
//! iteration and serialization deterministic.

use crate::errors::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub user_id: String,
    pub available: BTreeMap<String, i64>,
    pub reserved: BTreeMap<String, i64>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            available: BTreeMap::new(),
            reserved: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn available_balance(&self, asset: &str) -> i64 {
        self.available.get(asset).copied().unwrap_or(0)
    }

    pub fn reserved_balance(&self, asset: &str) -> i64 {
        self.reserved.get(asset).copied().unwrap_or(0)
    }

    pub fn credit_available(&mut self, asset: &str, amount: i64) {
        *self.available.entry(asset.to_string()).or_insert(0) += amount;
        self.touch();
    }

    /// Debit from `available`, refusing to produce a negative balance.
    pub fn debit_available(&mut self, asset: &str, amount: i64) -> Result<(), EngineError> {
        let balance = self.available_balance(asset);
        if balance < amount {
            return Err(EngineError::InsufficientFunds {
                asset: asset.to_string(),
                required: amount,
                available: balance,
            });
        }
        self.available.insert(asset.to_string(), balance - amount);
        self.touch();
        Ok(())
    }

    pub fn credit_reserved(&mut self, asset: &str, amount: i64) {
        *self.reserved.entry(asset.to_string()).or_insert(0) += amount;
        self.touch();
    }

    /// Debit from `reserved`. Underflow here means a reservation was lost
    /// track of, which the engine invariants rule out.
    pub fn debit_reserved(&mut self, asset: &str, amount: i64) -> Result<(), EngineError> {
        let balance = self.reserved_balance(asset);
        if balance < amount {
            return Err(EngineError::BalanceUnderflow {
                asset: asset.to_string(),
            });
        }
        self.reserved.insert(asset.to_string(), balance - amount);
        self.touch();
        Ok(())
    }

    /// Move up to `amount` from `reserved` back to `available`, capped at
    /// the current reserved balance. Returns the amount actually moved.
    pub fn release_reserved(&mut self, asset: &str, amount: i64) -> i64 {
        let release = amount.min(self.reserved_balance(asset));
        if release <= 0 {
            return 0;
        }
        let balance = self.reserved_balance(asset);
        self.reserved.insert(asset.to_string(), balance - release);
        *self.available.entry(asset.to_string()).or_insert(0) += release;
        self.touch();
        release
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
