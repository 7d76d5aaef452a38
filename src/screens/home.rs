// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact list screen.

use crate::db::DocumentStore;
use crate::error::Result;
use crate::forms::{ContactDraft, Form};
use crate::models::Contact;
use crate::screens::settle;
use crate::services::ContactService;
use crate::session::ClientContext;
use crate::sync::{Snapshot, Subscription, SubscriptionRegistry, ViewScope};
use crate::views::{self, ContactStats, Tab};

/// The home view: live contact list, search, tabs and the add/edit form.
///
/// Writes are pessimistic. Nothing is changed locally; the list reflects a
/// write once the next snapshot arrives.
pub struct ContactsScreen<S: DocumentStore> {
    service: ContactService<S>,
    scope: ViewScope,
    contacts: Subscription<Contact>,
    pub form: Form<ContactDraft>,
    query: String,
    tab: Tab,
    alert: Option<String>,
}

impl<S: DocumentStore> ContactsScreen<S> {
    /// Mount the view and open its contact subscription.
    pub fn mount(
        service: ContactService<S>,
        registry: &SubscriptionRegistry,
        ctx: &ClientContext,
    ) -> Result<Self> {
        let scope = ViewScope::mount(registry);
        let contacts = service.subscribe(&scope, ctx)?;
        Ok(Self {
            service,
            scope,
            contacts,
            form: Form::new(),
            query: String::new(),
            tab: Tab::All,
            alert: None,
        })
    }

    pub fn view_id(&self) -> crate::sync::ViewId {
        self.scope.id()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Alert from the last list action (delete, favorite).
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// True until the first snapshot arrives.
    pub fn is_loading(&self) -> bool {
        self.contacts.is_loading()
    }

    pub fn snapshot(&self) -> Snapshot<Contact> {
        self.contacts.current()
    }

    /// Rows for the current query and tab.
    pub fn visible(&self) -> Vec<Contact> {
        let snapshot = self.contacts.current();
        views::filtered_contacts(&snapshot, &self.query, self.tab)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ContactStats {
        views::stats(&self.contacts.current())
    }

    /// Wait for the next snapshot push.
    pub async fn changed(&mut self) -> Result<Snapshot<Contact>> {
        self.contacts.changed().await
    }

    /// Wait until the list satisfies `predicate`.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Result<Snapshot<Contact>>
    where
        F: FnMut(&[Contact]) -> bool,
    {
        self.contacts.wait_for(predicate).await
    }

    /// Open the form for a new contact.
    pub fn open_new(&mut self) {
        self.form.reset();
    }

    /// Open the form prefilled with an existing contact.
    pub fn open_edit(&mut self, contact: &Contact) {
        self.form.load(ContactDraft::from_contact(contact));
    }

    /// Submit the add/edit form. Returns the contact ID.
    ///
    /// `None` means the view was torn down while the write was in flight and
    /// the response was dropped.
    pub async fn save(&mut self, ctx: &ClientContext) -> Option<Result<String>> {
        let service = self.service.clone();
        let outcome = self
            .form
            .submit(|draft| async move { service.save(ctx, &draft).await })
            .await;
        self.scope.accept(outcome)
    }

    /// Hard-delete a contact. Deleting one that is already gone is a no-op.
    pub async fn delete(&mut self, ctx: &ClientContext, id: &str) -> Option<Result<()>> {
        let outcome = match self.service.delete(ctx, id).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(id, "Contact already deleted");
                Ok(())
            }
            other => other,
        };
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "delete_contact", outcome))
    }

    pub async fn toggle_favorite(
        &mut self,
        ctx: &ClientContext,
        contact: &Contact,
    ) -> Option<Result<()>> {
        let outcome = self.service.toggle_favorite(ctx, contact).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "toggle_favorite", outcome))
    }

    /// Tear the view down, closing its subscription.
    pub fn unmount(self) {
        let id = self.scope.id();
        drop(self.contacts);
        self.scope.unmount();
        tracing::debug!(view = id, "Contacts screen closed");
    }
}
