// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile persistence.
//!
//! The profile is a singleton per user stored at `users/{uid}`. It is created
//! lazily on first save and never physically deleted: deactivation flips
//! `isActive` and reactivation flips it back.

use crate::db::{new_document_id, DocumentStore, FieldMap};
use crate::error::{AppError, Result};
use crate::forms::{FormDraft, ProfileDraft};
use crate::models::catalog::activity_type;
use crate::models::{Activity, ProfilePatch, SocialLink, UserProfile};
use crate::services::storage::ObjectStorage;
use crate::services::{ensure_profile_editable, load_owned, stamped_patch};
use crate::session::{ClientContext, Session};
use crate::sync::{Subscription, ViewScope};
use crate::time_utils::{calendar_day, format_utc_rfc3339, timestamp_now, today};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prefix of uploaded profile images in object storage.
const PROFILE_IMAGE_DIR: &str = "profile_images";

/// Everything the profile screen shows, as exported by the developer tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExport {
    pub profile: UserProfile,
    pub social_links: Vec<SocialLink>,
    pub activities: Vec<Activity>,
    pub export_date: String,
}

impl ProfileExport {
    /// Pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode export: {}", e)))
    }
}

/// Profile reads and writes, plus profile image upload.
#[derive(Clone)]
pub struct ProfileService<S> {
    store: S,
    storage: Arc<dyn ObjectStorage>,
    default_avatar_url: String,
}

impl<S: DocumentStore> ProfileService<S> {
    pub fn new(store: S, storage: Arc<dyn ObjectStorage>, default_avatar_url: String) -> Self {
        Self {
            store,
            storage,
            default_avatar_url,
        }
    }

    /// The stored profile, if the user ever saved one.
    pub async fn load(&self, ctx: &ClientContext) -> Result<Option<UserProfile>> {
        let session = ctx.require_session()?;
        self.store.get::<UserProfile>(&session.uid).await
    }

    /// The stored profile, or the defaults a new user starts from.
    pub async fn load_or_default(&self, ctx: &ClientContext) -> Result<UserProfile> {
        let session = ctx.require_session()?;
        Ok(self
            .store
            .get::<UserProfile>(&session.uid)
            .await?
            .unwrap_or_else(|| self.fresh_profile(&session.uid)))
    }

    fn fresh_profile(&self, uid: &str) -> UserProfile {
        UserProfile::new_for(uid, &self.default_avatar_url, today())
    }

    /// Save the edit form, creating the profile if it does not exist yet.
    pub async fn save(&self, ctx: &ClientContext, draft: &ProfileDraft) -> Result<UserProfile> {
        let session = ctx.require_session()?;
        draft.check()?;
        self.upsert(session, &draft.to_patch()).await
    }

    /// Merge `patch` into the profile, creating it from defaults if absent.
    async fn upsert(&self, session: &Session, patch: &ProfilePatch) -> Result<UserProfile> {
        match self.store.get::<UserProfile>(&session.uid).await? {
            Some(profile) if !profile.is_active => Err(AppError::Validation(
                "Profile is deactivated. Reactivate it to make changes.".to_string(),
            )),
            Some(mut profile) => {
                self.store
                    .merge::<UserProfile>(&session.uid, stamped_patch(patch)?)
                    .await?;
                patch.apply_to(&mut profile);

                tracing::info!(uid = %session.uid, "Profile updated");
                Ok(profile)
            }
            None => {
                let mut profile = self.fresh_profile(&session.uid);
                patch.apply_to(&mut profile);
                let now = timestamp_now();
                profile.created_at = Some(now.clone());
                profile.updated_at = Some(now);
                self.store.set(&profile).await?;

                tracing::info!(uid = %session.uid, "Profile created");
                Ok(profile)
            }
        }
    }

    /// Soft-delete: hide the profile from editing, keeping all of its data.
    pub async fn deactivate(&self, ctx: &ClientContext) -> Result<()> {
        self.set_active(ctx, false).await
    }

    pub async fn reactivate(&self, ctx: &ClientContext) -> Result<()> {
        self.set_active(ctx, true).await
    }

    // Only `isActive` is written so every other field round-trips unchanged.
    async fn set_active(&self, ctx: &ClientContext, active: bool) -> Result<()> {
        let session = ctx.require_session()?;
        let _existing: UserProfile = load_owned(&self.store, session, &session.uid).await?;

        let mut fields = FieldMap::new();
        fields.insert("isActive".to_string(), serde_json::Value::Bool(active));
        self.store.merge::<UserProfile>(&session.uid, fields).await?;

        tracing::info!(uid = %session.uid, active, "Profile activation changed");
        Ok(())
    }

    /// Upload a new avatar image and point the profile at it.
    pub async fn upload_avatar(&self, ctx: &ClientContext, image: Vec<u8>) -> Result<String> {
        let session = ctx.require_session()?;
        if image.is_empty() {
            return Err(AppError::Validation("No image selected".to_string()));
        }
        ensure_profile_editable(&self.store, session).await?;

        let path = format!(
            "{}/{}.jpg",
            PROFILE_IMAGE_DIR,
            Utc::now().timestamp_millis()
        );
        let url = self
            .storage
            .upload(session, &path, image, "image/jpeg")
            .await?;

        let patch = ProfilePatch {
            avatar: Some(url.clone()),
            ..Default::default()
        };
        self.upsert(session, &patch).await?;
        Ok(url)
    }

    /// Delete an uploaded image. The profile falls back to the default avatar
    /// if it was using it.
    pub async fn delete_image(&self, ctx: &ClientContext, url: &str) -> Result<()> {
        let session = ctx.require_session()?;

        match self.storage.delete(session, url).await {
            Ok(()) => {}
            Err(AppError::NotFound(detail)) => {
                tracing::warn!(uid = %session.uid, detail = %detail, "Image already gone");
            }
            Err(e) => return Err(e),
        }

        if let Some(profile) = self.store.get::<UserProfile>(&session.uid).await? {
            if profile.avatar == url {
                let patch = ProfilePatch {
                    avatar: Some(self.default_avatar_url.clone()),
                    ..Default::default()
                };
                self.store
                    .merge::<UserProfile>(&session.uid, stamped_patch(&patch)?)
                    .await?;
            }
        }
        Ok(())
    }

    /// Profile, links and activities in one document.
    pub async fn export_data(&self, ctx: &ClientContext) -> Result<ProfileExport> {
        let session = ctx.require_session()?;
        let profile = self
            .store
            .get::<UserProfile>(&session.uid)
            .await?
            .unwrap_or_else(|| self.fresh_profile(&session.uid));
        let social_links = self.store.list::<SocialLink>(&session.uid).await?;
        let mut activities = self.store.list::<Activity>(&session.uid).await?;
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::info!(
            uid = %session.uid,
            links = social_links.len(),
            activities = activities.len(),
            "Profile data exported"
        );
        Ok(ProfileExport {
            profile,
            social_links,
            activities,
            export_date: timestamp_now(),
        })
    }

    /// Fill the profile with a sample user, two links and two activities.
    pub async fn import_sample_data(&self, ctx: &ClientContext) -> Result<()> {
        let session = ctx.require_session()?;
        ensure_profile_editable(&self.store, session).await?;

        let sample = ProfilePatch {
            name: Some("John Doe".to_string()),
            username: Some("@johndoe".to_string()),
            location: Some("New York, USA".to_string()),
            bio: Some("Software developer passionate about mobile apps and clean code.".to_string()),
            followers: Some("1.2K".to_string()),
            following: Some("500".to_string()),
            posts: Some("85".to_string()),
            email: Some("john@example.com".to_string()),
            phone: Some("+1 555 123 4567".to_string()),
            avatar: None,
        };
        self.upsert(session, &sample).await?;

        let now = Utc::now();
        let stamp = format_utc_rfc3339(now);
        for (platform, url, icon) in [
            ("GitHub", "https://github.com/johndoe", "github"),
            ("LinkedIn", "https://linkedin.com/in/johndoe", "linkedin-square"),
        ] {
            let link = SocialLink {
                id: new_document_id()?,
                platform: platform.to_string(),
                url: url.to_string(),
                icon: icon.to_string(),
                owner_id: session.uid.clone(),
                created_at: Some(stamp.clone()),
                updated_at: Some(stamp.clone()),
            };
            self.store.set(&link).await?;
        }

        for (days_ago, kind, description) in [
            (0, "code", "Released a new React Native component library"),
            (1, "star", "Starred an interesting machine learning repository"),
        ] {
            let at = now - Duration::days(days_ago);
            let color = activity_type(kind).map(|t| t.color).unwrap_or_default();
            let activity = Activity {
                id: new_document_id()?,
                kind: kind.to_string(),
                description: description.to_string(),
                icon: kind.to_string(),
                color: color.to_string(),
                date: calendar_day(at),
                owner_id: session.uid.clone(),
                created_at: Some(format_utc_rfc3339(at)),
                updated_at: Some(stamp.clone()),
            };
            self.store.set(&activity).await?;
        }

        tracing::info!(uid = %session.uid, "Sample data imported");
        Ok(())
    }

    /// Delete all links and activities and reset the profile to defaults.
    pub async fn reset_all_data(&self, ctx: &ClientContext) -> Result<()> {
        let session = ctx.require_session()?;

        let links = self.store.list::<SocialLink>(&session.uid).await?;
        for link in &links {
            self.store.delete::<SocialLink>(&link.id).await?;
        }
        let activities = self.store.list::<Activity>(&session.uid).await?;
        for activity in &activities {
            self.store.delete::<Activity>(&activity.id).await?;
        }

        let previous = self.store.get::<UserProfile>(&session.uid).await?;
        let mut profile = self.fresh_profile(&session.uid);
        let now = timestamp_now();
        profile.created_at = previous
            .and_then(|p| p.created_at)
            .or_else(|| Some(now.clone()));
        profile.updated_at = Some(now);
        self.store.set(&profile).await?;

        tracing::info!(
            uid = %session.uid,
            links = links.len(),
            activities = activities.len(),
            "Profile data reset"
        );
        Ok(())
    }

    /// Live snapshots of the user's profile (zero or one record).
    pub fn subscribe(
        &self,
        scope: &ViewScope,
        ctx: &ClientContext,
    ) -> Result<Subscription<UserProfile>> {
        scope.subscribe(&self.store, ctx)
    }
}
