//! In-memory position book and reentrancy guard
//!
//! The book is the one piece of shared mutable state the engine and the
//! trade-action gateway both touch: the engine reads positions and flips
//! `account.status`; the gateway adds/removes positions as trades settle.
//! Readers and writers for a single sub-account are serialized by the
//! reentrancy guard during liquidation cascades; outside a cascade the
//! `DashMap` entry lock provides the only synchronization needed.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tokio::sync::RwLock;

use types::account::Account;
use types::ids::{PositionId, SubAccountId};
use types::position::Position;
use types::risk::Rules;

use std::collections::HashMap;

/// A sub-account's full engine-visible state.
#[derive(Debug, Clone)]
pub struct BookEntry {
    pub account: Account,
    pub positions: HashMap<PositionId, Position>,
    /// Last-known rules, used whenever `RulesProvider::get_rules` fails
    /// (spec §7, `RulesUnavailable`).
    pub rules: Rules,
}

impl BookEntry {
    pub fn new(account: Account, rules: Rules) -> Self {
        Self {
            account,
            positions: HashMap::new(),
            rules,
        }
    }

    pub fn positions_vec(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }
}

/// Mapping from sub-account id to its entry.
///
/// Not async: every operation here is a local map lookup. The engine's
/// `await`s happen only on the collaborators in `collaborators.rs`.
pub trait PositionBook: Send + Sync {
    fn get_entry(&self, id: &SubAccountId) -> Option<Arc<RwLock<BookEntry>>>;
    /// Bulk replace: drops the previous contents entirely.
    fn load(&self, entries: Vec<(SubAccountId, BookEntry)>);
    fn delete(&self, id: &SubAccountId);
    fn ids(&self) -> Vec<SubAccountId>;
}

/// Default `PositionBook` backed by a `DashMap`.
#[derive(Default)]
pub struct InMemoryPositionBook {
    entries: DashMap<SubAccountId, Arc<RwLock<BookEntry>>>,
}

impl InMemoryPositionBook {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert or replace a single entry without disturbing the rest of the
    /// book — used by tests and by gateways onboarding one account at a
    /// time.
    pub fn upsert(&self, id: SubAccountId, entry: BookEntry) {
        self.entries.insert(id, Arc::new(RwLock::new(entry)));
    }
}

impl PositionBook for InMemoryPositionBook {
    fn get_entry(&self, id: &SubAccountId) -> Option<Arc<RwLock<BookEntry>>> {
        self.entries.get(id).map(|e| Arc::clone(e.value()))
    }

    fn load(&self, entries: Vec<(SubAccountId, BookEntry)>) {
        self.entries.clear();
        for (id, entry) in entries {
            self.entries.insert(id, Arc::new(RwLock::new(entry)));
        }
    }

    fn delete(&self, id: &SubAccountId) {
        self.entries.remove(id);
    }

    fn ids(&self) -> Vec<SubAccountId> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}

/// Tracks sub-accounts currently inside a liquidation cascade.
///
/// An incoming `evaluate_account` that finds its id already present
/// returns immediately (spec §5); this collapses the "50 concurrent ticks
/// on one underwater account" case to a single cascade.
#[derive(Default)]
pub struct ReentrancyGuard {
    inflight: DashSet<SubAccountId>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self {
            inflight: DashSet::new(),
        }
    }

    pub fn is_inflight(&self, id: &SubAccountId) -> bool {
        self.inflight.contains(id)
    }

    /// Returns `true` if this call inserted the id (i.e. no cascade was
    /// already running for it).
    pub fn enter(&self, id: &SubAccountId) -> bool {
        self.inflight.insert(id.clone())
    }

    pub fn exit(&self, id: &SubAccountId) {
        self.inflight.remove(id);
    }
}
