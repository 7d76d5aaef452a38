//! Database layer (document store).
//!
//! [`DocumentStore`] is the thin seam over the hosted document database.
//! [`FirestoreDb`] talks to the real backend; [`MemoryStore`] keeps documents
//! in process and pushes changes immediately.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::{AppError, Result};
use crate::models::{Activity, Contact, SocialLink, UserProfile};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use futures_util::stream::BoxStream;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{de::DeserializeOwned, Serialize};

/// Collection names as constants.
pub mod collections {
    pub const CONTACTS: &str = "contacts";
    /// User profiles (keyed by user ID)
    pub const USERS: &str = "users";
    pub const SOCIAL_LINKS: &str = "socialLinks";
    pub const ACTIVITIES: &str = "activities";
}

/// Field holding the owning user's ID on every document.
pub const OWNER_FIELD: &str = "uId";

/// Field updated on every merge-write.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Partial document used for merge-writes.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// A document type stored in its own collection.
pub trait Record:
    Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static
{
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
}

impl Record for Contact {
    const COLLECTION: &'static str = collections::CONTACTS;

    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Record for UserProfile {
    const COLLECTION: &'static str = collections::USERS;

    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Record for SocialLink {
    const COLLECTION: &'static str = collections::SOCIAL_LINKS;

    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Record for Activity {
    const COLLECTION: &'static str = collections::ACTIVITIES;

    fn id(&self) -> &str {
        &self.id
    }
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Operations the hosted document database offers.
///
/// `merge` has the backend's upsert semantics; strict update is a policy
/// decided by the services on top.
#[async_trait]
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Fetch one document by ID.
    async fn get<T: Record>(&self, id: &str) -> Result<Option<T>>;

    /// All documents of `T`'s collection owned by `owner_id`.
    async fn list<T: Record>(&self, owner_id: &str) -> Result<Vec<T>>;

    /// Write a full document, replacing any existing one with the same ID.
    async fn set<T: Record>(&self, record: &T) -> Result<()>;

    /// Merge the supplied fields into a document, creating it if absent.
    async fn merge<T: Record>(&self, id: &str, fields: FieldMap) -> Result<()>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete<T: Record>(&self, id: &str) -> Result<()>;

    /// Ticks whenever `T`'s collection may have changed.
    ///
    /// Subscribers re-read the collection on each tick; spurious ticks are
    /// allowed. The stream ends when the store shuts down.
    fn changes<T: Record>(&self) -> BoxStream<'static, ()>;
}

/// Serialize a patch into the field map for a merge-write.
pub fn to_field_map<P: Serialize>(patch: &P) -> Result<FieldMap> {
    match serde_json::to_value(patch)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode patch: {}", e)))?
    {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "Patch must encode as an object, got {}",
            other
        ))),
    }
}

/// Generate a new document ID: 20 URL-safe characters from 15 random bytes.
pub fn new_document_id() -> Result<String> {
    let mut bytes = [0u8; 15];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System random source unavailable")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactPatch;

    #[test]
    fn test_document_ids_are_unique_and_url_safe() {
        let a = new_document_id().unwrap();
        let b = new_document_id().unwrap();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_field_map_from_patch() {
        let patch = ContactPatch {
            is_favorite: Some(true),
            ..Default::default()
        };
        let map = to_field_map(&patch).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["isFavorite"], serde_json::Value::Bool(true));
    }
}
