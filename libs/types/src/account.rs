//! Account types for the cross-margin liquidation engine
//!
//! Implements the Account model per spec §3 (Data Model).

use crate::ids::SubAccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an account is force-reduced once it crosses the liquidation threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidationMode {
    /// Auto-deleveraging: partial closes at tier 2/3 before a hard liquidation.
    Adl30,
    /// No ADL tiers — any breach of the critical band goes straight to a
    /// hard liquidation.
    InstantClose,
}

/// Account status, owned exclusively by the engine during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    /// Temporarily suspended; the engine skips evaluation without emitting.
    Frozen,
    /// Terminal: all positions closed, no further evaluation occurs.
    Liquidated,
}

/// A cross-margin sub-account per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: SubAccountId,
    /// Realized cash balance, independent of any open position's P&L.
    pub current_balance: Decimal,
    /// Multiplier on exposure (notional) used in the margin-ratio numerator.
    /// Must be in (0, 1).
    pub maintenance_rate: Decimal,
    pub liquidation_mode: LiquidationMode,
    pub status: AccountStatus,
}

impl Account {
    pub fn new(
        id: SubAccountId,
        current_balance: Decimal,
        maintenance_rate: Decimal,
        liquidation_mode: LiquidationMode,
    ) -> Self {
        Self {
            id,
            current_balance,
            maintenance_rate,
            liquidation_mode,
            status: AccountStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    /// Guarded statuses per spec §4.3 step 1: evaluation returns without
    /// emitting for these.
    pub fn is_guarded(&self) -> bool {
        matches!(
            self.status,
            AccountStatus::Liquidated | AccountStatus::Frozen
        )
    }
}
