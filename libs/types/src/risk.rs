//! Per-account risk rules and pre-trade validation results
//!
//! Implements the Rules model per spec §3 and the pre-trade validator
//! response shape per spec §4.5.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-account risk rules per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// T ∈ (0, 1], typically 0.90.
    pub liquidation_threshold: Decimal,
    pub max_leverage: Decimal,
    pub max_notional_per_trade: Decimal,
    pub max_total_exposure: Decimal,
}

impl Rules {
    /// Built-in defaults used when a `RulesProvider` is unavailable and the
    /// entry has no cached rules (spec §7, `RulesUnavailable`).
    pub fn defaults() -> Self {
        Self {
            liquidation_threshold: Decimal::new(90, 2), // 0.90
            max_leverage: Decimal::from(20),
            max_notional_per_trade: Decimal::from(1_000_000),
            max_total_exposure: Decimal::from(5_000_000),
        }
    }
}

/// Result of the pre-trade validator per spec §4.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreTradeCheck {
    pub valid: bool,
    pub errors: Vec<String>,
    pub computed_notional: Decimal,
    pub computed_total_exposure: Decimal,
    pub computed_required_margin: Decimal,
}
