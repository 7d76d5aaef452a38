// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Contact Keeper: a contacts and profile manager over a hosted document store.
//!
//! This crate is a thin client: records live in Firestore, accounts in the
//! Identity Toolkit and profile images in object storage. Views mirror
//! their collections through cancellable full-snapshot subscriptions and
//! write through the per-entity services.

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod screens;
pub mod services;
pub mod session;
pub mod sync;
pub mod time_utils;
pub mod views;

use config::Config;
use db::DocumentStore;
use error::Result;
use screens::profile::ProfileServices;
use screens::{ContactsScreen, ProfileScreen};
use services::{
    ActivityService, ContactService, IdentityProvider, ObjectStorage, ProfileService,
    SocialLinkService,
};
use session::ClientContext;
use std::sync::Arc;
use sync::SubscriptionRegistry;

/// Shared application state for one client.
pub struct AppState<S: DocumentStore> {
    pub config: Config,
    pub store: S,
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    pub subscriptions: SubscriptionRegistry,
    pub contacts: ContactService<S>,
    pub profiles: ProfileService<S>,
    pub social_links: SocialLinkService<S>,
    pub activities: ActivityService<S>,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(
        config: Config,
        store: S,
        identity: Arc<dyn IdentityProvider>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            contacts: ContactService::new(store.clone()),
            profiles: ProfileService::new(
                store.clone(),
                storage.clone(),
                config.default_avatar_url.clone(),
            ),
            social_links: SocialLinkService::new(store.clone()),
            activities: ActivityService::new(store.clone()),
            subscriptions: SubscriptionRegistry::new(),
            config,
            store,
            identity,
            storage,
        }
    }

    /// Mount the home (contact list) view.
    pub fn contacts_screen(&self, ctx: &ClientContext) -> Result<ContactsScreen<S>> {
        ContactsScreen::mount(self.contacts.clone(), &self.subscriptions, ctx)
    }

    /// Mount the profile view.
    pub fn profile_screen(&self, ctx: &ClientContext) -> Result<ProfileScreen<S>> {
        let services = ProfileServices {
            profiles: self.profiles.clone(),
            social_links: self.social_links.clone(),
            activities: self.activities.clone(),
        };
        ProfileScreen::mount(services, &self.subscriptions, ctx)
    }

    /// Sign out: clear the session and close every open subscription.
    pub fn sign_out(&self, ctx: &mut ClientContext) {
        screens::sign_out(ctx, &self.subscriptions);
    }
}
