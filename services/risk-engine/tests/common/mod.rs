//! Shared fakes for end-to-end evaluation scenario tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use risk_engine::book::{BookEntry, InMemoryPositionBook, PositionBook};
use risk_engine::collaborators::{PriceService, RulesProvider, TradeActions};
use risk_engine::events::{EngineEvent, EventEmitter};
use types::account::{Account, LiquidationMode};
use types::errors::{GatewayError, PriceError, RulesError};
use types::ids::{PositionId, SubAccountId};
use types::numeric::{Price, Quantity};
use types::position::{Position, PositionSide};
use types::risk::Rules;

/// In-memory mark-price cache; never fails `get_fresh_price` unless the
/// symbol was never seeded.
#[derive(Default)]
pub struct FakePriceService {
    prices: DashMap<String, Decimal>,
}

impl FakePriceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, symbol: &str, price: Decimal) {
        self.prices.insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl PriceService for FakePriceService {
    fn get_price(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(symbol).map(|p| *p)
    }

    fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices.insert(symbol.to_string(), price);
    }

    async fn get_fresh_price(&self, symbol: &str) -> Result<Decimal, PriceError> {
        self.get_price(symbol)
            .ok_or_else(|| PriceError::PriceUnavailable {
                symbol: symbol.to_string(),
            })
    }
}

/// Trade-action gateway whose `partial_close`, by default, does NOT
/// shrink the position in the book — this is what exercises the
/// "gateway did not reduce notional" branch of the tier 3 escalation
/// open question (scenario 5).
#[derive(Default)]
pub struct FakeTradeActions {
    pub close_calls: AtomicUsize,
    pub partial_close_calls: AtomicUsize,
    pub liquidate_calls: AtomicUsize,
    pub fail_liquidate: std::sync::atomic::AtomicBool,
    pub last_partial_close_fraction: Mutex<Option<Decimal>>,
}

impl FakeTradeActions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeActions for FakeTradeActions {
    async fn close_position(&self, _position_id: &PositionId, _reason: &str) -> Result<(), GatewayError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn partial_close(
        &self,
        _position_id: &PositionId,
        fraction: Decimal,
        _reason: &str,
    ) -> Result<(), GatewayError> {
        self.partial_close_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_partial_close_fraction.lock().await = Some(fraction);
        Ok(())
    }

    async fn liquidate_position(&self, _position_id: &PositionId) -> Result<(), GatewayError> {
        self.liquidate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_liquidate.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable {
                reason: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRulesProvider;

#[async_trait]
impl RulesProvider for FakeRulesProvider {
    async fn get_rules(&self, _sub_account_id: &SubAccountId) -> Result<Rules, RulesError> {
        Ok(Rules::defaults())
    }
}

/// Collects every emitted event in order for assertion.
#[derive(Default)]
pub struct CollectingEmitter {
    pub events: Mutex<Vec<EngineEvent>>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventEmitter for CollectingEmitter {
    async fn emit(&self, event: EngineEvent) {
        self.events.lock().await.push(event);
    }
}

pub fn make_position(
    id: &str,
    sub_account_id: &str,
    side: PositionSide,
    entry: Decimal,
    qty: Decimal,
) -> Position {
    Position::new(
        PositionId::new(id),
        SubAccountId::new(sub_account_id),
        "BTC",
        side,
        Price::try_new(entry).expect("positive entry price"),
        Quantity::new(qty),
        Decimal::from(10),
        Decimal::from(0),
        None,
        1_700_000_000_000,
    )
}

pub fn make_book_with_entry(
    sub_account_id: &str,
    balance: Decimal,
    maintenance_rate: Decimal,
    liquidation_mode: LiquidationMode,
    threshold: Decimal,
    positions: Vec<Position>,
) -> Arc<InMemoryPositionBook> {
    let book = Arc::new(InMemoryPositionBook::new());
    let mut rules = Rules::defaults();
    rules.liquidation_threshold = threshold;

    let account = Account::new(
        SubAccountId::new(sub_account_id),
        balance,
        maintenance_rate,
        liquidation_mode,
    );
    let mut entry = BookEntry::new(account, rules);
    for position in positions {
        entry.positions.insert(position.id.clone(), position);
    }
    book.upsert(SubAccountId::new(sub_account_id), entry);
    book
}

pub async fn account_status(book: &InMemoryPositionBook, sub_account_id: &str) -> types::account::AccountStatus {
    let entry = book.get_entry(&SubAccountId::new(sub_account_id)).unwrap();
    let guard = entry.read().await;
    guard.account.status
}
