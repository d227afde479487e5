//! Collaborator interfaces consumed by the liquidation engine
//!
//! The engine is deliberately ignorant of how prices are sourced, how
//! positions are persisted, how trade actions reach the matching engine,
//! or how events are delivered downstream. It only depends on these
//! traits, so the hot path can be driven by fakes in tests and by real
//! adapters in production without touching `engine.rs`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use types::errors::{GatewayError, PriceError, RulesError};
use types::ids::{PositionId, SubAccountId};
use types::risk::Rules;

/// Last-known mark price per symbol.
///
/// `get_price`/`has_price` are synchronous reads of a local cache;
/// `get_fresh_price` may go out to an upstream feed.
#[async_trait]
pub trait PriceService: Send + Sync {
    fn get_price(&self, symbol: &str) -> Option<Decimal>;

    fn has_price(&self, symbol: &str) -> bool {
        self.get_price(symbol).is_some()
    }

    fn set_price(&self, symbol: &str, price: Decimal);

    async fn get_fresh_price(&self, symbol: &str) -> Result<Decimal, PriceError>;
}

/// Async trade-action gateway. All three operations are fire-and-await:
/// the engine only cares about acknowledgement, not the downstream
/// mechanics of actually reducing a position.
#[async_trait]
pub trait TradeActions: Send + Sync {
    async fn close_position(&self, position_id: &PositionId, reason: &str) -> Result<(), GatewayError>;

    async fn partial_close(
        &self,
        position_id: &PositionId,
        fraction: Decimal,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn liquidate_position(&self, position_id: &PositionId) -> Result<(), GatewayError>;
}

/// Per-account risk rules, consulted only off the hot path; the engine
/// reads cached rules from the `BookEntry` on every tick.
#[async_trait]
pub trait RulesProvider: Send + Sync {
    async fn get_rules(&self, sub_account_id: &SubAccountId) -> Result<Rules, RulesError>;
}
