// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookkeeping for open subscriptions.
//!
//! Each view may hold at most one subscription per collection. Opening a
//! second one for the same view and collection tears the first down.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Identifies one view instance.
pub type ViewId = u64;

/// Slot key: one per (view, collection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub view: ViewId,
    pub collection: &'static str,
}

struct Slot {
    generation: u64,
    /// Fired to tell the current holder it has been superseded.
    revoked: Arc<Notify>,
    superseded: Arc<AtomicBool>,
}

/// Registry of open subscriptions, shared by every view of one client.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    slots: DashMap<SubscriptionKey, Slot>,
    views: DashMap<ViewId, Arc<AtomicBool>>,
    next_view: AtomicU64,
    next_generation: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscriptions currently open.
    pub fn active_count(&self) -> usize {
        self.inner.slots.len()
    }

    /// Subscriptions currently open for one view.
    pub fn active_for(&self, view: ViewId) -> usize {
        self.inner
            .slots
            .iter()
            .filter(|entry| entry.key().view == view)
            .count()
    }

    pub(crate) fn open_view(&self) -> (ViewId, Arc<AtomicBool>) {
        let id = self.inner.next_view.fetch_add(1, Ordering::Relaxed) + 1;
        let alive = Arc::new(AtomicBool::new(true));
        self.inner.views.insert(id, alive.clone());
        (id, alive)
    }

    pub(crate) fn close_view(&self, view: ViewId) {
        if let Some((_, alive)) = self.inner.views.remove(&view) {
            alive.store(false, Ordering::SeqCst);
        }
        self.revoke_where(|key| key.view == view);
    }

    /// Mark every view torn down and revoke all subscriptions (sign out).
    pub fn close_all(&self) {
        for entry in self.inner.views.iter() {
            entry.value().store(false, Ordering::SeqCst);
        }
        self.inner.views.clear();
        self.revoke_where(|_| true);
    }

    fn revoke_where(&self, matches: impl Fn(&SubscriptionKey) -> bool) {
        let keys: Vec<SubscriptionKey> = self
            .inner
            .slots
            .iter()
            .filter(|entry| matches(entry.key()))
            .map(|entry| *entry.key())
            .collect();
        for key in keys {
            if let Some((_, slot)) = self.inner.slots.remove(&key) {
                slot.superseded.store(true, Ordering::SeqCst);
                slot.revoked.notify_one();
            }
        }
    }

    /// Claim the slot for `key`, revoking whatever held it before.
    pub(crate) fn register(&self, key: SubscriptionKey) -> RegistrationGuard {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let revoked = Arc::new(Notify::new());
        let superseded = Arc::new(AtomicBool::new(false));

        let previous = self.inner.slots.insert(
            key,
            Slot {
                generation,
                revoked: revoked.clone(),
                superseded: superseded.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::warn!(
                view = key.view,
                collection = key.collection,
                "Replacing open subscription for view"
            );
            previous.superseded.store(true, Ordering::SeqCst);
            previous.revoked.notify_one();
        }

        RegistrationGuard {
            registry: self.clone(),
            key,
            generation,
            revoked,
            superseded,
        }
    }
}

/// Holds a registry slot; releases it on drop.
pub(crate) struct RegistrationGuard {
    registry: SubscriptionRegistry,
    key: SubscriptionKey,
    generation: u64,
    revoked: Arc<Notify>,
    superseded: Arc<AtomicBool>,
}

impl RegistrationGuard {
    /// True once another subscription took this slot or the view was closed.
    pub(crate) fn is_revoked(&self) -> bool {
        self.superseded.load(Ordering::SeqCst)
    }

    /// Resolves when the slot is revoked.
    pub(crate) fn revoked(&self) -> Arc<Notify> {
        self.revoked.clone()
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        // Only clear the slot if it still belongs to this registration.
        self.registry
            .inner
            .slots
            .remove_if(&self.key, |_, slot| slot.generation == self.generation);
    }
}
