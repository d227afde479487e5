//! Position tracking types
//!
//! Implements the Position model per spec §3 (Data Model).

use crate::ids::{PositionId, SubAccountId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position side enum per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    /// Profits when mark price rises above entry.
    Long,
    /// Profits when mark price falls below entry.
    Short,
}

/// A single open position per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub sub_account_id: SubAccountId,
    pub symbol: String,
    pub side: PositionSide,
    pub entry_price: Price,
    pub quantity: Quantity,
    /// Exposure figure at open; the engine treats this as authoritative for
    /// margin-requirement math rather than re-deriving it every tick.
    pub notional: Decimal,
    pub leverage: Decimal,
    pub margin: Decimal,
    /// Advisory only; the engine never computes or updates this itself.
    pub liquidation_price: Option<Price>,
    pub opened_at: i64,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PositionId,
        sub_account_id: SubAccountId,
        symbol: impl Into<String>,
        side: PositionSide,
        entry_price: Price,
        quantity: Quantity,
        leverage: Decimal,
        margin: Decimal,
        liquidation_price: Option<Price>,
        opened_at: i64,
    ) -> Self {
        let notional = entry_price.as_decimal() * quantity.as_decimal();
        Self {
            id,
            sub_account_id,
            symbol: symbol.into(),
            side,
            entry_price,
            quantity,
            notional,
            leverage,
            margin,
            liquidation_price,
            opened_at,
        }
    }

    /// Invariant per spec §3: `notional ≈ entryPrice · quantity` at open.
    /// Allows a small tolerance for callers that construct positions from
    /// externally rounded notionals.
    pub fn check_notional_invariant(&self) -> bool {
        let expected = self.entry_price.as_decimal() * self.quantity.as_decimal();
        (self.notional - expected).abs() <= Decimal::new(1, 2)
    }

    /// Unrealized P&L at a given mark price per spec §3:
    /// LONG → `(mark − entry) · qty`; SHORT → `(entry − mark) · qty`.
    pub fn unrealized_pnl(&self, mark: Price) -> Decimal {
        let qty = self.quantity.as_decimal();
        match self.side {
            PositionSide::Long => (mark.as_decimal() - self.entry_price.as_decimal()) * qty,
            PositionSide::Short => (self.entry_price.as_decimal() - mark.as_decimal()) * qty,
        }
    }
}
