//! Engine event taxonomy
//!
//! Stable, externally-consumed event schema per spec. Modeled as one
//! discriminated union rather than a generic `{type, payload}` pair so
//! the compiler enforces that every variant carries exactly the fields
//! its subscribers expect.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use types::ids::{PositionId, SubAccountId};

/// Tier an ADL action was triggered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AdlTier {
    Two = 2,
    Three = 3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    PnlUpdate {
        sub_account_id: SubAccountId,
        position_id: PositionId,
        symbol: String,
        unrealized_pnl: Decimal,
        mark_price: Decimal,
    },
    MarginUpdate {
        sub_account_id: SubAccountId,
        equity: Decimal,
        margin_ratio: Decimal,
        total_notional: Decimal,
        status: Option<String>,
    },
    MarginWarning {
        sub_account_id: SubAccountId,
        margin_ratio: Decimal,
        threshold: Decimal,
    },
    AdlTriggered {
        sub_account_id: SubAccountId,
        tier: AdlTier,
        symbol: String,
        position_id: PositionId,
        fraction: Decimal,
        margin_ratio: Decimal,
    },
    FullLiquidation {
        sub_account_id: SubAccountId,
        margin_ratio: Decimal,
        mode: String,
    },
    /// Not in the original stable schema but required by the error-handling
    /// design: surfaces a `RulesUnavailable` fallback to built-in defaults.
    RulesFallback {
        sub_account_id: SubAccountId,
        reason: String,
    },
    /// Surfaces a swallowed `GatewayError` from the liquidation loop so a
    /// subscriber can alert on it without the hot path having to fail.
    LiquidationError {
        sub_account_id: SubAccountId,
        position_id: PositionId,
        reason: String,
    },
}

/// Fire-and-forget event sink. No backpressure is exposed to the engine —
/// an implementation that cannot keep up must drop, not block.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: EngineEvent);
}

/// Bounded ring buffer shared between the emitter and its receiver.
/// `tokio::sync::mpsc` has no way for a sender to evict a queued item, so a
/// drop-oldest policy needs its own buffer: a `Mutex`-guarded `VecDeque`
/// (same eviction shape as a bounded trade-history cache — pop the front
/// when at capacity, then push) plus a `Notify` to wake a waiting reader.
struct RingBuffer {
    queue: Mutex<VecDeque<EngineEvent>>,
    capacity: usize,
    notify: Notify,
}

/// Emitter backed by a bounded ring buffer with a drop-oldest policy, per
/// the emitter-backpressure design note: the hot path must never wait on
/// an unbounded or blocked external consumer, and a slow subscriber loses
/// stale backlog before it loses fresh telemetry.
pub struct ChannelEventEmitter {
    buffer: Arc<RingBuffer>,
}

/// The receiving end of a `ChannelEventEmitter`'s ring buffer.
pub struct EventReceiver {
    buffer: Arc<RingBuffer>,
}

impl ChannelEventEmitter {
    /// Returns the emitter paired with the receiving end of the buffer.
    pub fn new(capacity: usize) -> (Self, EventReceiver) {
        let buffer = Arc::new(RingBuffer {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
        });
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            EventReceiver { buffer },
        )
    }
}

#[async_trait]
impl EventEmitter for ChannelEventEmitter {
    async fn emit(&self, event: EngineEvent) {
        let mut queue = self.buffer.queue.lock().await;
        if queue.len() >= self.buffer.capacity {
            queue.pop_front();
            tracing::warn!("event buffer full, dropping oldest event");
        }
        queue.push_back(event);
        drop(queue);
        self.buffer.notify.notify_one();
    }
}

impl EventReceiver {
    /// Waits for and returns the next event, in FIFO order.
    pub async fn recv(&mut self) -> EngineEvent {
        loop {
            // Register interest before checking the queue so a notify()
            // racing with the check below isn't missed.
            let notified = self.buffer.notify.notified();
            {
                let mut queue = self.buffer.queue.lock().await;
                if let Some(event) = queue.pop_front() {
                    return event;
                }
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(ratio: i64) -> EngineEvent {
        EngineEvent::MarginWarning {
            sub_account_id: SubAccountId::new("acct-1"),
            margin_ratio: Decimal::new(ratio, 2),
            threshold: Decimal::new(90, 2),
        }
    }

    #[tokio::test]
    async fn test_channel_emitter_delivers_event() {
        let (emitter, mut rx) = ChannelEventEmitter::new(8);
        emitter.emit(warning(82)).await;

        let received = rx.recv().await;
        assert!(matches!(received, EngineEvent::MarginWarning { .. }));
    }

    #[tokio::test]
    async fn test_channel_emitter_evicts_oldest_when_full() {
        let (emitter, mut rx) = ChannelEventEmitter::new(2);
        emitter.emit(warning(1)).await;
        emitter.emit(warning(2)).await;
        // Buffer is now full at capacity 2; this third emit must evict the
        // oldest (ratio=1) rather than drop itself.
        emitter.emit(warning(3)).await;

        let first = rx.recv().await;
        let second = rx.recv().await;
        assert_eq!(
            first,
            EngineEvent::MarginWarning {
                sub_account_id: SubAccountId::new("acct-1"),
                margin_ratio: Decimal::new(2, 2),
                threshold: Decimal::new(90, 2),
            }
        );
        assert_eq!(
            second,
            EngineEvent::MarginWarning {
                sub_account_id: SubAccountId::new("acct-1"),
                margin_ratio: Decimal::new(3, 2),
                threshold: Decimal::new(90, 2),
            }
        );
    }
}
