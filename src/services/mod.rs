// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - persistence adapter and external collaborators.

pub mod activities;
pub mod auth;
pub mod contacts;
pub mod profile;
pub mod social_links;
pub mod storage;

pub use activities::ActivityService;
pub use auth::{AuthClient, IdentityProvider};
pub use contacts::ContactService;
pub use profile::{ProfileExport, ProfileService};
pub use social_links::SocialLinkService;
pub use storage::{ObjectStorage, StorageClient};

use crate::db::{to_field_map, DocumentStore, FieldMap, Record, UPDATED_AT_FIELD};
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::session::Session;
use crate::time_utils::timestamp_now;
use serde::Serialize;

/// Load a record the session user owns.
///
/// Missing records and records owned by someone else are both `NotFound`.
pub(crate) async fn load_owned<S: DocumentStore, T: Record>(
    store: &S,
    session: &Session,
    id: &str,
) -> Result<T> {
    match store.get::<T>(id).await? {
        Some(record) if record.owner_id() == session.uid => Ok(record),
        Some(_) => {
            tracing::warn!(
                collection = T::COLLECTION,
                id,
                uid = %session.uid,
                "Record owned by another user"
            );
            Err(AppError::NotFound(format!("{}/{}", T::COLLECTION, id)))
        }
        None => Err(AppError::NotFound(format!("{}/{}", T::COLLECTION, id))),
    }
}

/// Field map for a patch, stamped with `updatedAt`.
pub(crate) fn stamped_patch<P: Serialize>(patch: &P) -> Result<FieldMap> {
    let mut fields = to_field_map(patch)?;
    fields.insert(
        UPDATED_AT_FIELD.to_string(),
        serde_json::Value::String(timestamp_now()),
    );
    Ok(fields)
}

/// Profile-owned records can only be edited while the profile is active.
///
/// A user without a stored profile has nothing deactivated.
pub(crate) async fn ensure_profile_editable<S: DocumentStore>(
    store: &S,
    session: &Session,
) -> Result<()> {
    match store.get::<UserProfile>(&session.uid).await? {
        Some(profile) if !profile.is_active => Err(AppError::Validation(
            "Profile is deactivated. Reactivate it to make changes.".to_string(),
        )),
        _ => Ok(()),
    }
}
