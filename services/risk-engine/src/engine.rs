//! Liquidation engine — orchestrator and evaluation hot path
//!
//! `LiquidationEngine::evaluate_account` is the single public hot-path
//! operation: guard, compute, aggregate, classify, act. Everything
//! synchronous stays synchronous; the only suspension points are the
//! `await`s on trade-action calls (and, off the hot path, rules refresh).

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use types::ids::SubAccountId;

use crate::book::{BookEntry, PositionBook, ReentrancyGuard};
use crate::collaborators::{PriceService, RulesProvider, TradeActions};
use crate::config::EngineConfig;
use crate::events::{AdlTier, EngineEvent, EventEmitter};
use crate::liquidation::{self, Classification, HardLiquidationMode};
use crate::margin;

/// Ties the collaborator interfaces together behind the evaluation state
/// machine. Collaborators are trait objects rather than generics: the
/// engine is wired up once at startup and handed to many call sites, so
/// monomorphizing per collaborator type buys nothing here.
pub struct LiquidationEngine {
    price_service: Arc<dyn PriceService>,
    book: Arc<dyn PositionBook>,
    trade_actions: Arc<dyn TradeActions>,
    rules_provider: Arc<dyn RulesProvider>,
    emitter: Arc<dyn EventEmitter>,
    guard: ReentrancyGuard,
    config: EngineConfig,
}

impl LiquidationEngine {
    pub fn new(
        price_service: Arc<dyn PriceService>,
        book: Arc<dyn PositionBook>,
        trade_actions: Arc<dyn TradeActions>,
        rules_provider: Arc<dyn RulesProvider>,
        emitter: Arc<dyn EventEmitter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            price_service,
            book,
            trade_actions,
            rules_provider,
            emitter,
            guard: ReentrancyGuard::new(),
            config,
        }
    }

    /// The hot path. Never returns an error: every collaborator failure is
    /// swallowed and surfaced only through the emitter (spec §7).
    pub async fn evaluate_account(&self, sub_account_id: &SubAccountId) {
        let Some(entry_arc) = self.book.get_entry(sub_account_id) else {
            return;
        };

        {
            let entry = entry_arc.read().await;
            if entry.account.is_guarded() {
                return;
            }
        }
        if self.guard.is_inflight(sub_account_id) {
            return;
        }

        let (equity, total_notional, margin_ratio, threshold, mode) = {
            let entry = entry_arc.read().await;
            let mut total_pnl = Decimal::ZERO;
            for position in entry.positions.values() {
                let raw_mark = self.price_service.get_price(&position.symbol);
                let mark = margin::resolve_mark(position, raw_mark);
                let pnl = position.unrealized_pnl(mark);
                total_pnl += pnl;

                self.emitter
                    .emit(EngineEvent::PnlUpdate {
                        sub_account_id: sub_account_id.clone(),
                        position_id: position.id.clone(),
                        symbol: position.symbol.clone(),
                        unrealized_pnl: pnl,
                        mark_price: mark.as_decimal(),
                    })
                    .await;
            }

            let total_notional = margin::total_notional(&entry.positions_vec());
            let equity = margin::equity(entry.account.current_balance, total_pnl);
            let margin_ratio =
                margin::margin_ratio(total_notional, entry.account.maintenance_rate, equity);

            (
                equity,
                total_notional,
                margin_ratio,
                entry.rules.liquidation_threshold,
                entry.account.liquidation_mode,
            )
        };

        self.emitter
            .emit(EngineEvent::MarginUpdate {
                sub_account_id: sub_account_id.clone(),
                equity,
                margin_ratio,
                total_notional,
                status: None,
            })
            .await;

        let classification = liquidation::classify(equity, margin_ratio, threshold, mode, &self.config);
        debug!(?classification, %sub_account_id, %margin_ratio, "classified account");

        match classification {
            Classification::Healthy => {}
            Classification::Warning => {
                self.emitter
                    .emit(EngineEvent::MarginWarning {
                        sub_account_id: sub_account_id.clone(),
                        margin_ratio,
                        threshold,
                    })
                    .await;
            }
            Classification::AdlTier2 => {
                self.adl_partial_close(
                    &entry_arc,
                    sub_account_id,
                    AdlTier::Two,
                    self.config.tier2_fraction,
                    margin_ratio,
                )
                .await;
            }
            Classification::AdlTier3 => {
                self.adl_tier3(&entry_arc, sub_account_id, margin_ratio, threshold)
                    .await;
            }
            Classification::HardLiquidation(hard_mode) => {
                self.liquidate_all(&entry_arc, sub_account_id, margin_ratio, hard_mode)
                    .await;
            }
        }
    }

    /// Tier 2 ADL: partial-close the largest position by the configured
    /// fraction. Does not touch the reentrancy guard — only tier 3 and a
    /// hard liquidation are cascades.
    async fn adl_partial_close(
        &self,
        entry_arc: &Arc<RwLock<BookEntry>>,
        sub_account_id: &SubAccountId,
        tier: AdlTier,
        fraction: Decimal,
        margin_ratio: Decimal,
    ) {
        let largest = {
            let entry = entry_arc.read().await;
            liquidation::largest_position(&entry.positions_vec()).cloned()
        };

        let Some(position) = largest else {
            return;
        };

        let reason = match tier {
            AdlTier::Two => "ADL_TIER2",
            AdlTier::Three => "ADL_TIER3",
        };

        match self
            .trade_actions
            .partial_close(&position.id, fraction, reason)
            .await
        {
            Ok(()) => {
                self.emitter
                    .emit(EngineEvent::AdlTriggered {
                        sub_account_id: sub_account_id.clone(),
                        tier,
                        symbol: position.symbol.clone(),
                        position_id: position.id.clone(),
                        fraction,
                        margin_ratio,
                    })
                    .await;
            }
            Err(err) => {
                warn!(%sub_account_id, position_id = %position.id, %err, "partial close failed");
                self.emitter
                    .emit(EngineEvent::LiquidationError {
                        sub_account_id: sub_account_id.clone(),
                        position_id: position.id.clone(),
                        reason: err.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Tier 3 ADL: partial-close, then re-read the book and re-aggregate.
    /// The engine trusts whatever notional it finds there — it does not
    /// assume the gateway reduced it in place, and does not re-derive it
    /// itself. If the account is still at or above threshold, escalate to
    /// a hard liquidation without releasing the reentrancy guard between
    /// the two.
    async fn adl_tier3(
        &self,
        entry_arc: &Arc<RwLock<BookEntry>>,
        sub_account_id: &SubAccountId,
        margin_ratio: Decimal,
        threshold: Decimal,
    ) {
        if !self.guard.enter(sub_account_id) {
            return;
        }

        let largest = {
            let entry = entry_arc.read().await;
            liquidation::largest_position(&entry.positions_vec()).cloned()
        };

        let Some(position) = largest else {
            self.guard.exit(sub_account_id);
            return;
        };

        match self
            .trade_actions
            .partial_close(&position.id, self.config.tier3_fraction, "ADL_TIER3")
            .await
        {
            Ok(()) => {
                self.emitter
                    .emit(EngineEvent::AdlTriggered {
                        sub_account_id: sub_account_id.clone(),
                        tier: AdlTier::Three,
                        symbol: position.symbol.clone(),
                        position_id: position.id.clone(),
                        fraction: self.config.tier3_fraction,
                        margin_ratio,
                    })
                    .await;
            }
            Err(err) => {
                warn!(%sub_account_id, position_id = %position.id, %err, "tier 3 partial close failed");
                self.emitter
                    .emit(EngineEvent::LiquidationError {
                        sub_account_id: sub_account_id.clone(),
                        position_id: position.id.clone(),
                        reason: err.to_string(),
                    })
                    .await;
                self.guard.exit(sub_account_id);
                return;
            }
        }

        let (post_equity, post_total_notional) = {
            let entry = entry_arc.read().await;
            let mut total_pnl = Decimal::ZERO;
            for position in entry.positions.values() {
                let raw_mark = self.price_service.get_price(&position.symbol);
                let mark = margin::resolve_mark(position, raw_mark);
                total_pnl += position.unrealized_pnl(mark);
            }
            let total_notional = margin::total_notional(&entry.positions_vec());
            (margin::equity(entry.account.current_balance, total_pnl), total_notional)
        };
        let post_ratio = margin::margin_ratio(
            post_total_notional,
            {
                let entry = entry_arc.read().await;
                entry.account.maintenance_rate
            },
            post_equity,
        );

        if post_equity <= Decimal::ZERO || post_ratio >= threshold {
            self.liquidate_all_locked(
                entry_arc,
                sub_account_id,
                post_ratio,
                HardLiquidationMode::Adl30Escalated,
            )
            .await;
        }

        self.guard.exit(sub_account_id);
    }

    /// Public entry point for a hard liquidation: enters the reentrancy
    /// guard, runs the cascade, and exits on every path.
    async fn liquidate_all(
        &self,
        entry_arc: &Arc<RwLock<BookEntry>>,
        sub_account_id: &SubAccountId,
        margin_ratio: Decimal,
        mode: HardLiquidationMode,
    ) {
        if !self.guard.enter(sub_account_id) {
            return;
        }
        self.liquidate_all_locked(entry_arc, sub_account_id, margin_ratio, mode).await;
        self.guard.exit(sub_account_id);
    }

    /// The cascade body. Assumes the caller already holds the reentrancy
    /// guard for `sub_account_id` and will release it.
    async fn liquidate_all_locked(
        &self,
        entry_arc: &Arc<RwLock<BookEntry>>,
        sub_account_id: &SubAccountId,
        margin_ratio: Decimal,
        mode: HardLiquidationMode,
    ) {
        self.emitter
            .emit(EngineEvent::FullLiquidation {
                sub_account_id: sub_account_id.clone(),
                margin_ratio,
                mode: mode.as_str().to_string(),
            })
            .await;

        let position_ids: Vec<_> = {
            let entry = entry_arc.read().await;
            entry.positions.keys().cloned().collect()
        };

        for position_id in position_ids {
            if let Err(err) = self.trade_actions.liquidate_position(&position_id).await {
                warn!(%sub_account_id, %position_id, %err, "liquidate_position failed, continuing cascade");
                self.emitter
                    .emit(EngineEvent::LiquidationError {
                        sub_account_id: sub_account_id.clone(),
                        position_id,
                        reason: err.to_string(),
                    })
                    .await;
            }
        }

        {
            let mut entry = entry_arc.write().await;
            entry.account.status = types::account::AccountStatus::Liquidated;
        }

        self.emitter
            .emit(EngineEvent::MarginUpdate {
                sub_account_id: sub_account_id.clone(),
                equity: Decimal::ZERO,
                margin_ratio: Decimal::ZERO,
                total_notional: Decimal::ZERO,
                status: Some("LIQUIDATED".to_string()),
            })
            .await;
    }

    /// Off-path refresh of an account's cached rules. On provider failure
    /// the cached (or, if never refreshed, built-in default) rules stay in
    /// place and a `rules_fallback` event is emitted (spec §7).
    pub async fn refresh_rules(&self, sub_account_id: &SubAccountId) {
        let Some(entry_arc) = self.book.get_entry(sub_account_id) else {
            return;
        };

        match self.rules_provider.get_rules(sub_account_id).await {
            Ok(rules) => {
                let mut entry = entry_arc.write().await;
                entry.rules = rules;
            }
            Err(err) => {
                self.emitter
                    .emit(EngineEvent::RulesFallback {
                        sub_account_id: sub_account_id.clone(),
                        reason: err.to_string(),
                    })
                    .await;
            }
        }
    }
}
