// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Full-snapshot collection subscriptions.

use crate::db::{DocumentStore, Record};
use crate::error::{AppError, Result};
use crate::sync::registry::RegistrationGuard;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

/// The full visible collection as of the last push.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Live mirror of one user's slice of a collection.
///
/// Holds the last snapshot pushed by the store. Dropping the subscription
/// (or calling [`Subscription::unsubscribe`]) stops the background pump and
/// releases its registry slot.
pub struct Subscription<T: Record> {
    rx: watch::Receiver<Option<Snapshot<T>>>,
    pump: JoinHandle<()>,
    registration: RegistrationGuard,
}

impl<T: Record> Subscription<T> {
    pub(crate) fn start<S: DocumentStore>(
        store: S,
        owner_id: String,
        registration: RegistrationGuard,
    ) -> Self {
        let (tx, rx) = watch::channel(None);
        let revoked = registration.revoked();
        let pump = tokio::spawn(pump::<S, T>(store, owner_id, tx, revoked));
        Self {
            rx,
            pump,
            registration,
        }
    }

    /// Last pushed snapshot, or `None` while the first push is pending.
    pub fn snapshot(&self) -> Option<Snapshot<T>> {
        self.rx.borrow().clone()
    }

    /// Last pushed snapshot, or an empty collection while loading.
    pub fn current(&self) -> Snapshot<T> {
        self.snapshot().unwrap_or_default()
    }

    /// False once the view was torn down or a newer subscription replaced this one.
    pub fn is_active(&self) -> bool {
        !self.registration.is_revoked()
    }

    /// True until the first snapshot arrives.
    pub fn is_loading(&self) -> bool {
        self.rx.borrow().is_none()
    }

    /// Wait for the next pushed snapshot.
    pub async fn changed(&mut self) -> Result<Snapshot<T>> {
        loop {
            self.rx.changed().await.map_err(|_| {
                AppError::StoreUnavailable(format!("Subscription to {} ended", T::COLLECTION))
            })?;
            if let Some(snapshot) = self.rx.borrow_and_update().clone() {
                return Ok(snapshot);
            }
        }
    }

    /// Wait until a pushed snapshot satisfies `predicate`.
    ///
    /// Checks the current snapshot first.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Result<Snapshot<T>>
    where
        F: FnMut(&[T]) -> bool,
    {
        if let Some(snapshot) = self.rx.borrow_and_update().clone() {
            if predicate(&snapshot) {
                return Ok(snapshot);
            }
        }
        loop {
            let snapshot = self.changed().await?;
            if predicate(&snapshot) {
                return Ok(snapshot);
            }
        }
    }

    /// Stop receiving pushes.
    pub fn unsubscribe(self) {
        tracing::debug!(collection = T::COLLECTION, "Unsubscribed");
        // Drop does the teardown.
    }
}

impl<T: Record> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Re-read the collection on every change tick and publish it if it differs.
async fn pump<S: DocumentStore, T: Record>(
    store: S,
    owner_id: String,
    tx: watch::Sender<Option<Snapshot<T>>>,
    revoked: Arc<Notify>,
) {
    // Subscribe to changes before the first read so nothing slips between.
    let mut changes = store.changes::<T>();

    loop {
        match store.list::<T>(&owner_id).await {
            Ok(records) => {
                let published = tx.send_if_modified(|current| {
                    if current.as_deref() == Some(&records) {
                        return false;
                    }
                    *current = Some(Arc::new(records));
                    true
                });
                if published {
                    tracing::trace!(collection = T::COLLECTION, owner = %owner_id, "Snapshot pushed");
                }
            }
            Err(e) => {
                tracing::warn!(
                    collection = T::COLLECTION,
                    error = %e,
                    "Snapshot refresh failed"
                );
            }
        }

        if tx.is_closed() {
            break;
        }

        tokio::select! {
            tick = changes.next() => {
                if tick.is_none() {
                    break;
                }
            }
            _ = revoked.notified() => {
                tracing::debug!(collection = T::COLLECTION, "Subscription revoked");
                break;
            }
        }
    }
}
