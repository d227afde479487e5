//! Error taxonomy for the liquidation engine's collaborators
//!
//! Per spec §7: these are the errors collaborator interfaces may return.
//! The evaluator itself never propagates an `Err` out of
//! `evaluate_account` — every variant here is either swallowed with a
//! fallback or turned into an emitted event.

use thiserror::Error;

/// Returned by `PriceService::get_fresh_price`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("no price available for symbol {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("upstream returned a non-positive price for {symbol}: {value}")]
    NonPositivePrice { symbol: String, value: String },
}

/// Returned by `TradeActions::{close_position, partial_close,
/// liquidate_position}`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("position not found: {position_id}")]
    PositionNotFound { position_id: String },

    #[error("trade action rejected: {reason}")]
    Rejected { reason: String },

    #[error("trade action gateway unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Returned by `RulesProvider::get_rules`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("rules provider unavailable: {reason}")]
    Unavailable { reason: String },
}
