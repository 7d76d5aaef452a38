// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact persistence.
//!
//! Contacts are hard-deleted. Updates are strict: the contact must exist and
//! belong to the session user.

use crate::db::{new_document_id, to_field_map, DocumentStore};
use crate::error::{AppError, Result};
use crate::forms::{ContactDraft, FormDraft};
use crate::models::{Contact, ContactPatch};
use crate::services::load_owned;
use crate::session::ClientContext;
use crate::sync::{Subscription, ViewScope};

/// Create/read/update/delete and subscribe for the `contacts` collection.
#[derive(Clone)]
pub struct ContactService<S> {
    store: S,
}

impl<S: DocumentStore> ContactService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store a new contact with a fresh ID and the session user as owner.
    pub async fn create(&self, ctx: &ClientContext, draft: &ContactDraft) -> Result<Contact> {
        let session = ctx.require_session()?;
        draft.check()?;

        let contact = draft.to_contact(new_document_id()?, &session.uid);
        self.store.set(&contact).await?;

        tracing::info!(uid = %session.uid, id = %contact.id, "Contact created");
        Ok(contact)
    }

    /// Fetch one of the session user's contacts.
    pub async fn get(&self, ctx: &ClientContext, id: &str) -> Result<Contact> {
        let session = ctx.require_session()?;
        load_owned(&self.store, session, id).await
    }

    /// Merge the supplied fields into an existing contact.
    ///
    /// Text fields are trimmed and a new name re-derives the avatar. Fails with `NotFound` if the contact
    /// does not exist.
    pub async fn update(&self, ctx: &ClientContext, id: &str, patch: ContactPatch) -> Result<()> {
        let session = ctx.require_session()?;

        let patch = patch.trimmed().with_derived_avatar();
        for (label, value) in [("Name", &patch.name), ("Phone", &patch.phone)] {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(AppError::Validation(format!("{} cannot be empty", label)));
            }
        }

        let _existing: Contact = load_owned(&self.store, session, id).await?;
        self.store.merge::<Contact>(id, to_field_map(&patch)?).await?;

        tracing::info!(uid = %session.uid, id, "Contact updated");
        Ok(())
    }

    /// Save the form: update when the draft carries an ID, create otherwise.
    pub async fn save(&self, ctx: &ClientContext, draft: &ContactDraft) -> Result<String> {
        if draft.is_new() {
            return self.create(ctx, draft).await.map(|c| c.id);
        }
        draft.check()?;
        self.update(ctx, &draft.id, draft.to_patch()).await?;
        Ok(draft.id.clone())
    }

    /// Flip the favorite flag.
    pub async fn toggle_favorite(&self, ctx: &ClientContext, contact: &Contact) -> Result<()> {
        let patch = ContactPatch {
            is_favorite: Some(!contact.is_favorite),
            ..Default::default()
        };
        self.update(ctx, &contact.id, patch).await
    }

    /// Hard-delete a contact. Fails with `NotFound` if it does not exist.
    pub async fn delete(&self, ctx: &ClientContext, id: &str) -> Result<()> {
        let session = ctx.require_session()?;
        let _existing: Contact = load_owned(&self.store, session, id).await?;
        self.store.delete::<Contact>(id).await?;

        tracing::info!(uid = %session.uid, id, "Contact deleted");
        Ok(())
    }

    /// Live snapshots of the session user's contacts.
    pub fn subscribe(&self, scope: &ViewScope, ctx: &ClientContext) -> Result<Subscription<Contact>> {
        scope.subscribe(&self.store, ctx)
    }
}
