//! Opaque identifier types for the liquidation engine's domain
//!
//! Sub-account and position ids are treated as opaque strings per the
//! upstream account/position services — the engine never parses or derives
//! meaning from them, only compares and orders them (position ids must sort
//! lexicographically for deterministic "largest position" tie-breaks).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a cross-margin sub-account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubAccountId(String);

impl SubAccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubAccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubAccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier for a single position within a sub-account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(String);

impl PositionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PositionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PositionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
