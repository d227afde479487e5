//! Cross-margin aggregation
//!
//! Deterministic computation of per-position unrealized P&L, account
//! equity, total notional, and margin ratio. All arithmetic runs on
//! `Decimal` — no binary floating-point ever touches an equity comparison.

use rust_decimal::Decimal;
use types::numeric::Price;
use types::position::Position;

/// Resolve the mark price to use for a position this tick: the raw
/// price-service reading if it's a valid positive price, else the
/// position's own entry price (stale-price fallback, uPnL = 0).
pub fn resolve_mark(position: &Position, raw: Option<Decimal>) -> Price {
    raw.and_then(Price::try_new).unwrap_or(position.entry_price)
}

/// `equity = currentBalance + Σ unrealizedPnl`.
pub fn equity(current_balance: Decimal, total_unrealized_pnl: Decimal) -> Decimal {
    current_balance + total_unrealized_pnl
}

/// `totalNotional = Σ position.notional`.
pub fn total_notional(positions: &[Position]) -> Decimal {
    positions.iter().fold(Decimal::ZERO, |acc, p| acc + p.notional)
}

/// Sentinel used in emitted payloads when equity is non-positive and the
/// ratio would otherwise be undefined or negative.
pub const MARGIN_RATIO_SENTINEL: i64 = 999;

/// `marginRatio = (totalNotional · maintenanceRate) / equity` if
/// `equity > 0`, else the sentinel `+∞` representation.
pub fn margin_ratio(total_notional: Decimal, maintenance_rate: Decimal, equity: Decimal) -> Decimal {
    if equity <= Decimal::ZERO {
        return Decimal::from(MARGIN_RATIO_SENTINEL);
    }
    (total_notional * maintenance_rate) / equity
}
