// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile screen: profile card, social links, activity feed.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::forms::{ActivityDraft, Form, ProfileDraft, SocialLinkDraft};
use crate::models::{Activity, SocialLink, UserProfile};
use crate::screens::settle;
use crate::services::{ActivityService, ProfileService, SocialLinkService};
use crate::session::ClientContext;
use crate::sync::{Subscription, SubscriptionRegistry, ViewScope};
use crate::views;

/// Services the profile screen writes through.
#[derive(Clone)]
pub struct ProfileServices<S> {
    pub profiles: ProfileService<S>,
    pub social_links: SocialLinkService<S>,
    pub activities: ActivityService<S>,
}

pub struct ProfileScreen<S: DocumentStore> {
    services: ProfileServices<S>,
    scope: ViewScope,
    profile: Subscription<UserProfile>,
    links: Subscription<SocialLink>,
    activities: Subscription<Activity>,
    pub profile_form: Form<ProfileDraft>,
    pub link_form: Form<SocialLinkDraft>,
    pub activity_form: Form<ActivityDraft>,
    editing_link: Option<String>,
    editing_activity: Option<String>,
    alert: Option<String>,
}

impl<S: DocumentStore> ProfileScreen<S> {
    /// Mount the view and open its three subscriptions.
    pub fn mount(
        services: ProfileServices<S>,
        registry: &SubscriptionRegistry,
        ctx: &ClientContext,
    ) -> Result<Self> {
        let scope = ViewScope::mount(registry);
        let profile = services.profiles.subscribe(&scope, ctx)?;
        let links = services.social_links.subscribe(&scope, ctx)?;
        let activities = services.activities.subscribe(&scope, ctx)?;

        Ok(Self {
            services,
            scope,
            profile,
            links,
            activities,
            profile_form: Form::new(),
            link_form: Form::new(),
            activity_form: Form::new(),
            editing_link: None,
            editing_activity: None,
            alert: None,
        })
    }

    pub fn view_id(&self) -> crate::sync::ViewId {
        self.scope.id()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_loading(&self) -> bool {
        self.profile.is_loading() || self.links.is_loading() || self.activities.is_loading()
    }

    /// The stored profile, if one exists.
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.current().first().cloned()
    }

    /// Editing is offered only while the profile is active.
    pub fn can_edit(&self) -> bool {
        self.profile().map_or(true, |p| p.is_active)
    }

    pub fn social_links(&self) -> Vec<SocialLink> {
        self.links.current().to_vec()
    }

    /// Activity feed, newest first.
    pub fn activities(&self) -> Vec<Activity> {
        views::activities_newest_first(&self.activities.current())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Wait for the next push on any of the screen's subscriptions.
    pub async fn changed(&mut self) -> Result<()> {
        tokio::select! {
            r = self.profile.changed() => r.map(|_| ()),
            r = self.links.changed() => r.map(|_| ()),
            r = self.activities.changed() => r.map(|_| ()),
        }
    }

    /// Wait until the stored profile satisfies `predicate`.
    pub async fn wait_for_profile<F>(&mut self, mut predicate: F) -> Result<UserProfile>
    where
        F: FnMut(&UserProfile) -> bool,
    {
        let snapshot = self
            .profile
            .wait_for(|profiles| profiles.first().is_some_and(&mut predicate))
            .await?;
        snapshot
            .first()
            .cloned()
            .ok_or_else(|| AppError::NotFound("users/profile".to_string()))
    }

    pub async fn wait_for_links<F>(&mut self, predicate: F) -> Result<Vec<SocialLink>>
    where
        F: FnMut(&[SocialLink]) -> bool,
    {
        Ok(self.links.wait_for(predicate).await?.to_vec())
    }

    pub async fn wait_for_activities<F>(&mut self, predicate: F) -> Result<Vec<Activity>>
    where
        F: FnMut(&[Activity]) -> bool,
    {
        Ok(self.activities.wait_for(predicate).await?.to_vec())
    }

    /// Open the edit-profile form with the current values.
    pub fn start_editing(&mut self) {
        let profile = self.profile().unwrap_or_default();
        self.profile_form.load(ProfileDraft::from_profile(&profile));
    }

    pub async fn save_profile(&mut self, ctx: &ClientContext) -> Option<Result<UserProfile>> {
        let profiles = self.services.profiles.clone();
        let outcome = self
            .profile_form
            .submit(|draft| async move { profiles.save(ctx, &draft).await })
            .await;
        self.scope.accept(outcome)
    }

    pub async fn deactivate(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let outcome = self.services.profiles.deactivate(ctx).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "deactivate_profile", outcome))
    }

    pub async fn reactivate(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let outcome = self.services.profiles.reactivate(ctx).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "reactivate_profile", outcome))
    }

    pub async fn upload_avatar(
        &mut self,
        ctx: &ClientContext,
        image: Vec<u8>,
    ) -> Option<Result<String>> {
        let outcome = self.services.profiles.upload_avatar(ctx, image).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "upload_avatar", outcome))
    }

    /// Open the link form, prefilled when editing an existing link.
    pub fn open_link(&mut self, link: Option<&SocialLink>) {
        match link {
            Some(link) => {
                self.editing_link = Some(link.id.clone());
                self.link_form.load(SocialLinkDraft::from_link(link));
            }
            None => {
                self.editing_link = None;
                self.link_form.reset();
            }
        }
    }

    pub async fn save_link(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let service = self.services.social_links.clone();
        let editing = self.editing_link.clone();
        let outcome = self
            .link_form
            .submit(|draft| async move {
                match editing {
                    Some(id) => service.update(ctx, &id, &draft).await,
                    None => service.create(ctx, &draft).await.map(|_| ()),
                }
            })
            .await;
        if outcome.is_ok() {
            self.editing_link = None;
        }
        self.scope.accept(outcome)
    }

    pub async fn delete_link(&mut self, ctx: &ClientContext, id: &str) -> Option<Result<()>> {
        let outcome = match self.services.social_links.delete(ctx, id).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        };
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "delete_social_link", outcome))
    }

    /// Open the activity form, prefilled when editing an existing activity.
    pub fn open_activity(&mut self, activity: Option<&Activity>) {
        match activity {
            Some(activity) => {
                self.editing_activity = Some(activity.id.clone());
                self.activity_form.load(ActivityDraft::from_activity(activity));
            }
            None => {
                self.editing_activity = None;
                self.activity_form.reset();
            }
        }
    }

    pub async fn save_activity(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let service = self.services.activities.clone();
        let editing = self.editing_activity.clone();
        let outcome = self
            .activity_form
            .submit(|draft| async move {
                match editing {
                    Some(id) => service.update(ctx, &id, &draft).await,
                    None => service.create(ctx, &draft).await.map(|_| ()),
                }
            })
            .await;
        if outcome.is_ok() {
            self.editing_activity = None;
        }
        self.scope.accept(outcome)
    }

    pub async fn delete_activity(&mut self, ctx: &ClientContext, id: &str) -> Option<Result<()>> {
        let outcome = match self.services.activities.delete(ctx, id).await {
            Err(e) if e.is_not_found() => Ok(()),
            other => other,
        };
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "delete_activity", outcome))
    }

    /// Export profile, links and activities as pretty JSON.
    pub async fn export_json(&mut self, ctx: &ClientContext) -> Option<Result<String>> {
        let outcome = match self.services.profiles.export_data(ctx).await {
            Ok(export) => export.to_json_pretty(),
            Err(e) => Err(e),
        };
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "export_data", outcome))
    }

    pub async fn import_sample_data(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let outcome = self.services.profiles.import_sample_data(ctx).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "import_sample_data", outcome))
    }

    pub async fn reset_all_data(&mut self, ctx: &ClientContext) -> Option<Result<()>> {
        let outcome = self.services.profiles.reset_all_data(ctx).await;
        let outcome = self.scope.accept(outcome)?;
        Some(settle(&mut self.alert, "reset_all_data", outcome))
    }

    /// Tear the view down, closing all three subscriptions.
    pub fn unmount(self) {
        self.scope.unmount();
    }
}
