//! Liquidation Engine Service
//!
//! A real-time, cross-margin liquidation engine for a perpetual-futures
//! venue. Maintains an in-memory position book and, on every tick,
//! recomputes P&L, equity, and margin ratio for the affected sub-account,
//! escalating through warning, ADL tiers, and forced liquidation as the
//! ratio crosses configured thresholds.
//!
//! See `engine::LiquidationEngine::evaluate_account` for the entry point.

pub mod book;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod events;
pub mod liquidation;
pub mod margin;
pub mod validator;
