// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social link persistence.

use crate::db::{new_document_id, DocumentStore};
use crate::error::Result;
use crate::forms::{FormDraft, SocialLinkDraft};
use crate::models::SocialLink;
use crate::services::{ensure_profile_editable, load_owned, stamped_patch};
use crate::session::ClientContext;
use crate::sync::{Subscription, ViewScope};
use crate::time_utils::timestamp_now;

/// Social links of the session user. Duplicate platforms are allowed.
#[derive(Clone)]
pub struct SocialLinkService<S> {
    store: S,
}

impl<S: DocumentStore> SocialLinkService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, ctx: &ClientContext, draft: &SocialLinkDraft) -> Result<SocialLink> {
        let session = ctx.require_session()?;
        draft.check()?;
        ensure_profile_editable(&self.store, session).await?;

        let now = timestamp_now();
        let link = SocialLink {
            id: new_document_id()?,
            platform: draft.platform.trim().to_string(),
            url: draft.url.trim().to_string(),
            icon: draft.icon.clone(),
            owner_id: session.uid.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        self.store.set(&link).await?;

        tracing::info!(uid = %session.uid, id = %link.id, platform = %link.platform, "Social link created");
        Ok(link)
    }

    /// Replace the link's platform, URL and icon. Fails with `NotFound` if absent.
    pub async fn update(&self, ctx: &ClientContext, id: &str, draft: &SocialLinkDraft) -> Result<()> {
        let session = ctx.require_session()?;
        draft.check()?;
        ensure_profile_editable(&self.store, session).await?;

        let _existing: SocialLink = load_owned(&self.store, session, id).await?;
        self.store
            .merge::<SocialLink>(id, stamped_patch(&draft.to_patch())?)
            .await?;

        tracing::info!(uid = %session.uid, id, "Social link updated");
        Ok(())
    }

    pub async fn delete(&self, ctx: &ClientContext, id: &str) -> Result<()> {
        let session = ctx.require_session()?;
        ensure_profile_editable(&self.store, session).await?;

        let _existing: SocialLink = load_owned(&self.store, session, id).await?;
        self.store.delete::<SocialLink>(id).await?;

        tracing::info!(uid = %session.uid, id, "Social link deleted");
        Ok(())
    }

    pub fn subscribe(
        &self,
        scope: &ViewScope,
        ctx: &ClientContext,
    ) -> Result<Subscription<SocialLink>> {
        scope.subscribe(&self.store, ctx)
    }
}
