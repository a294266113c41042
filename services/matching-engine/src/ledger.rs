//! Wallet ledger: per-user balances, created lazily.
//!
//! Fresh wallets are seeded with a starting quote balance, a simulation
//! affordance so that new users can trade immediately. The ledger knows
//! nothing about orders; reservation and settlement logic live above it and
//! speak to wallets through their mutation primitives.

use exchange_types::wallet::Wallet;
use std::collections::HashMap;

pub const DEFAULT_QUOTE_ASSET: &str = "USD";
pub const DEFAULT_QUOTE_BALANCE: i64 = 100_000;

#[derive(Debug, Default)]
pub struct Ledger {
    wallets: HashMap<String, Wallet>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
        }
    }

    /// Return the user's wallet, creating and seeding it on first reference.
    pub fn ensure(&mut self, user_id: &str) -> &mut Wallet {
        self.wallets.entry(user_id.to_string()).or_insert_with(|| {
            let mut wallet = Wallet::new(user_id);
            wallet.credit_available(DEFAULT_QUOTE_ASSET, DEFAULT_QUOTE_BALANCE);
            wallet
        })
    }

    /// Deep copy of the user's wallet for external readers.
    pub fn snapshot(&mut self, user_id: &str) -> Wallet {
        self.ensure(user_id).clone()
    }

    /// Administrative credit. Non-positive amounts and empty assets are
    /// silently ignored; the asset name is normalized to uppercase.
    pub fn fund(&mut self, user_id: &str, asset: &str, amount: i64) {
        if amount <= 0 {
            return;
        }
        let asset = asset.trim().to_uppercase();
        if asset.is_empty() {
            return;
        }
        self.ensure(user_id).credit_available(&asset, amount);
    }
}
