// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local reactive state.
//!
//! A view opens its subscriptions through a [`ViewScope`] when it mounts and
//! tears them all down when it unmounts. Snapshots are written only by the
//! subscription pump; views read them.

pub mod registry;
pub mod subscription;

pub use registry::{SubscriptionKey, SubscriptionRegistry, ViewId};
pub use subscription::{Snapshot, Subscription};

use crate::db::{DocumentStore, Record};
use crate::error::{AppError, Result};
use crate::session::ClientContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifetime of one mounted view.
pub struct ViewScope {
    id: ViewId,
    alive: Arc<AtomicBool>,
    registry: SubscriptionRegistry,
}

impl ViewScope {
    /// Mount a new view.
    pub fn mount(registry: &SubscriptionRegistry) -> Self {
        let (id, alive) = registry.open_view();
        tracing::debug!(view = id, "View mounted");
        Self {
            id,
            alive,
            registry: registry.clone(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// False once the view was unmounted or the client signed out.
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Open the view's subscription to `T`'s collection for the session user.
    ///
    /// A view holds at most one subscription per collection; subscribing
    /// again revokes the previous one.
    pub fn subscribe<S: DocumentStore, T: Record>(
        &self,
        store: &S,
        ctx: &ClientContext,
    ) -> Result<Subscription<T>> {
        if !self.is_active() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "View {} is torn down",
                self.id
            )));
        }
        let session = ctx.require_session()?;

        let registration = self.registry.register(SubscriptionKey {
            view: self.id,
            collection: T::COLLECTION,
        });
        tracing::debug!(view = self.id, collection = T::COLLECTION, uid = %session.uid, "Subscribed");

        Ok(Subscription::start(
            store.clone(),
            session.uid.clone(),
            registration,
        ))
    }

    /// Pass an operation outcome through only while the view is mounted.
    ///
    /// In-flight writes cannot be cancelled; a response that lands after
    /// teardown is dropped here.
    pub fn accept<R>(&self, outcome: R) -> Option<R> {
        if self.is_active() {
            Some(outcome)
        } else {
            tracing::debug!(view = self.id, "Discarding response for torn-down view");
            None
        }
    }

    /// Tear the view down, revoking all of its subscriptions.
    pub fn unmount(self) {
        // Drop does the teardown.
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        if self.alive.load(Ordering::SeqCst) {
            tracing::debug!(view = self.id, "View unmounted");
        }
        self.registry.close_view(self.id);
    }
}
