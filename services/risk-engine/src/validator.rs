//! Pre-trade validator
//!
//! Exposed but secondary to the evaluation hot path (spec §4.5): a pure
//! function over a `BookEntry` snapshot, used by the gateway before it
//! accepts a new order, never by `evaluate_account` itself.

use rust_decimal::Decimal;

use types::position::PositionSide;
use types::risk::PreTradeCheck;

use crate::book::BookEntry;
use crate::margin;

/// Proposed trade a caller wants validated against the current book.
#[derive(Debug, Clone)]
pub struct ProposedTrade {
    pub symbol: String,
    pub side: PositionSide,
    pub quantity: Decimal,
    pub leverage: Decimal,
    pub price: Decimal,
}

/// Validate a proposed trade against the account's cached rules and
/// current positions. Checks, in order: leverage ceiling, per-trade
/// notional ceiling, total-exposure ceiling, available balance.
pub fn validate(entry: &BookEntry, trade: &ProposedTrade) -> PreTradeCheck {
    let mut errors = Vec::new();

    let notional = trade.quantity * trade.price;
    let existing_notional = margin::total_notional(&entry.positions_vec());
    let total_exposure = existing_notional + notional;
    let required_margin = if trade.leverage > Decimal::ZERO {
        notional / trade.leverage
    } else {
        notional
    };

    if trade.leverage > entry.rules.max_leverage {
        errors.push(format!(
            "leverage {} exceeds max {}",
            trade.leverage, entry.rules.max_leverage
        ));
    }

    if notional > entry.rules.max_notional_per_trade {
        errors.push(format!(
            "notional {} exceeds max per-trade notional {}",
            notional, entry.rules.max_notional_per_trade
        ));
    }

    if total_exposure > entry.rules.max_total_exposure {
        errors.push(format!(
            "total exposure {} would exceed max {}",
            total_exposure, entry.rules.max_total_exposure
        ));
    }

    if entry.account.current_balance < required_margin {
        errors.push(format!(
            "balance {} insufficient for required margin {}",
            entry.account.current_balance, required_margin
        ));
    }

    PreTradeCheck {
        valid: errors.is_empty(),
        errors,
        computed_notional: notional,
        computed_total_exposure: total_exposure,
        computed_required_margin: required_margin,
    }
}
