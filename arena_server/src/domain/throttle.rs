// Per-key rate limiting for repeated actions.

use super::entity::EntityId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Connect,
    Move,
    Fire,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    pub kind: ActionKind,
    pub entity: EntityId,
}

impl ThrottleKey {
    pub fn new(kind: ActionKind, entity: EntityId) -> Self {
        Self { kind, entity }
    }
}

/// Last accepted timestamp per throttle key.
#[derive(Debug, Default)]
pub struct ThrottleTable {
    last_accepted: HashMap<ThrottleKey, Instant>,
}

impl ThrottleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false while less than `interval` has passed since the last
    /// accepted action for `key`.
    pub fn allows(&self, key: &ThrottleKey, interval: Duration, now: Instant) -> bool {
        match self.last_accepted.get(key) {
            Some(last) => now.saturating_duration_since(*last) >= interval,
            None => true,
        }
    }

    /// Records an accepted action. Timestamps never move backwards.
    pub fn record(&mut self, key: ThrottleKey, now: Instant) {
        self.last_accepted
            .entry(key)
            .and_modify(|last| *last = (*last).max(now))
            .or_insert(now);
    }

    pub fn last_accepted(&self, key: &ThrottleKey) -> Option<Instant> {
        self.last_accepted.get(key).copied()
    }

    /// Drops every entry belonging to `entity`.
    pub fn forget(&mut self, entity: EntityId) {
        self.last_accepted.retain(|key, _| key.entity != entity);
    }

    pub fn len(&self) -> usize {
        self.last_accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_accepted.is_empty()
    }
}
