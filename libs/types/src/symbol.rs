//! Trading pair symbols.
//!
//! A symbol names a pair as `BASE-QUOTE` (e.g. `BTC-USD`). Parsing trims and
//! uppercases both tokens, so `btc-usd` normalizes to `BTC-USD`; anything
//! without exactly two non-empty tokens is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol must be BASE-QUOTE format")]
pub struct SymbolError;

/// Validated trading pair symbol in canonical `BASE-QUOTE` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() != 2 {
            return Err(SymbolError);
        }
        let base = parts[0].trim().to_uppercase();
        let quote = parts[1].trim().to_uppercase();
        if base.is_empty() || quote.is_empty() {
            return Err(SymbolError);
        }
        Ok(Self(format!("{base}-{quote}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The asset being traded (`BTC` in `BTC-USD`).
    pub fn base(&self) -> &str {
        match self.0.split_once('-') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }

    /// The asset the price is denominated in (`USD` in `BTC-USD`).
    pub fn quote(&self) -> &str {
        match self.0.split_once('-') {
            Some((_, quote)) => quote,
            None => &self.0,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Symbol::parse(&s).map_err(serde::de::Error::custom)
    }
}
