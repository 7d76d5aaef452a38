// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity feed persistence.
//!
//! Storage order is unspecified; views sort newest first.

use crate::db::{new_document_id, DocumentStore};
use crate::error::Result;
use crate::forms::{ActivityDraft, FormDraft};
use crate::models::Activity;
use crate::services::{ensure_profile_editable, load_owned, stamped_patch};
use crate::session::ClientContext;
use crate::sync::{Subscription, ViewScope};
use crate::time_utils::{calendar_day, format_utc_rfc3339};

#[derive(Clone)]
pub struct ActivityService<S> {
    store: S,
}

impl<S: DocumentStore> ActivityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new activity dated today.
    pub async fn create(&self, ctx: &ClientContext, draft: &ActivityDraft) -> Result<Activity> {
        let session = ctx.require_session()?;
        draft.check()?;
        ensure_profile_editable(&self.store, session).await?;

        let now = chrono::Utc::now();
        let stamp = format_utc_rfc3339(now);
        let activity = Activity {
            id: new_document_id()?,
            kind: draft.kind.clone(),
            description: draft.description.trim().to_string(),
            icon: draft.icon.clone(),
            color: draft.color.clone(),
            date: calendar_day(now),
            owner_id: session.uid.clone(),
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        };
        self.store.set(&activity).await?;

        tracing::info!(uid = %session.uid, id = %activity.id, kind = %activity.kind, "Activity created");
        Ok(activity)
    }

    /// Merge the draft into an existing activity. Fails with `NotFound` if absent.
    pub async fn update(&self, ctx: &ClientContext, id: &str, draft: &ActivityDraft) -> Result<()> {
        let session = ctx.require_session()?;
        draft.check()?;
        ensure_profile_editable(&self.store, session).await?;

        let _existing: Activity = load_owned(&self.store, session, id).await?;
        self.store
            .merge::<Activity>(id, stamped_patch(&draft.to_patch())?)
            .await?;

        tracing::info!(uid = %session.uid, id, "Activity updated");
        Ok(())
    }

    pub async fn delete(&self, ctx: &ClientContext, id: &str) -> Result<()> {
        let session = ctx.require_session()?;
        ensure_profile_editable(&self.store, session).await?;

        let _existing: Activity = load_owned(&self.store, session, id).await?;
        self.store.delete::<Activity>(id).await?;

        tracing::info!(uid = %session.uid, id, "Activity deleted");
        Ok(())
    }

    pub fn subscribe(
        &self,
        scope: &ViewScope,
        ctx: &ClientContext,
    ) -> Result<Subscription<Activity>> {
        scope.subscribe(&self.store, ctx)
    }
}
