//! Classification state machine
//!
//! Pure decision logic for the evaluation hot path: given equity, margin
//! ratio, and the account's liquidation mode, decide what action (if any)
//! the engine must take. Kept free of I/O so it can be exercised directly
//! by property tests.

use rust_decimal::Decimal;
use types::account::LiquidationMode;
use types::ids::PositionId;
use types::position::Position;

use crate::config::EngineConfig;

/// Reason a hard liquidation was triggered, surfaced in `full_liquidation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardLiquidationMode {
    Hard,
    InstantClose,
    Adl30Escalated,
}

impl HardLiquidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HardLiquidationMode::Hard => "HARD",
            HardLiquidationMode::InstantClose => "INSTANT_CLOSE",
            HardLiquidationMode::Adl30Escalated => "ADL_30_ESCALATED",
        }
    }
}

/// Outcome of classifying one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Healthy,
    Warning,
    AdlTier2,
    AdlTier3,
    HardLiquidation(HardLiquidationMode),
}

/// Classify an account per the tier table. `margin_ratio` and `equity`
/// must already be freshly computed for this tick; `threshold` is the
/// account's `Rules::liquidation_threshold` (T).
///
/// First match wins, in the order the table is written: equity breach,
/// instant-close breach, tier 3, tier 2, tier 1 warning, healthy.
pub fn classify(
    equity: Decimal,
    margin_ratio: Decimal,
    threshold: Decimal,
    mode: LiquidationMode,
    config: &EngineConfig,
) -> Classification {
    if equity <= Decimal::ZERO {
        return Classification::HardLiquidation(HardLiquidationMode::Hard);
    }

    let critical = threshold + config.critical_band;
    if margin_ratio >= critical {
        return match mode {
            LiquidationMode::InstantClose => {
                Classification::HardLiquidation(HardLiquidationMode::InstantClose)
            }
            LiquidationMode::Adl30 => Classification::AdlTier3,
        };
    }

    if margin_ratio >= threshold {
        return Classification::AdlTier2;
    }

    let warning_floor = threshold - config.warning_band;
    if margin_ratio >= warning_floor {
        return Classification::Warning;
    }

    Classification::Healthy
}

/// Select the largest open position by notional; ties broken by the
/// smallest `positionId` lexicographically, per spec.
pub fn largest_position(positions: &[Position]) -> Option<&Position> {
    positions.iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) => {
            if candidate.notional > current.notional {
                Some(candidate)
            } else if candidate.notional == current.notional && candidate.id < current.id {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    })
}

/// Convenience accessor used by the engine when it only needs the id.
pub fn largest_position_id(positions: &[Position]) -> Option<PositionId> {
    largest_position(positions).map(|p| p.id.clone())
}
