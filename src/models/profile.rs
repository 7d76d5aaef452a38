//! User profile model.

use serde::{Deserialize, Serialize};

/// Singleton profile per user, stored in `users/{uid}`.
///
/// `is_active` is a soft-delete flag: a deactivated profile keeps all its
/// data and can be reactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Document ID (the owning user's ID)
    pub id: String,
    pub name: String,
    pub username: String,
    pub location: String,
    pub bio: String,
    /// Display counters, stored as text ("1.2K" is valid)
    pub followers: String,
    pub following: String,
    pub posts: String,
    /// Avatar image URI
    pub avatar: String,
    pub is_active: bool,
    /// Join day (YYYY-MM-DD)
    pub join_date: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "uId")]
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            username: String::new(),
            location: String::new(),
            bio: String::new(),
            followers: "0".to_string(),
            following: "0".to_string(),
            posts: "0".to_string(),
            avatar: String::new(),
            is_active: true,
            join_date: String::new(),
            email: String::new(),
            phone: String::new(),
            owner_id: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl UserProfile {
    /// Fresh profile for a user who has never saved one.
    pub fn new_for(owner_id: &str, default_avatar: &str, join_date: String) -> Self {
        Self {
            id: owner_id.to_string(),
            owner_id: owner_id.to_string(),
            avatar: default_avatar.to_string(),
            join_date,
            ..Default::default()
        }
    }

    /// True when none of the user-entered identity fields are filled in.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.username.is_empty()
            && self.bio.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
    }
}

/// Partial profile for merge-writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfilePatch {
    /// Apply the supplied fields onto a full profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        let fields = [
            (&self.name, &mut profile.name),
            (&self.username, &mut profile.username),
            (&self.location, &mut profile.location),
            (&self.bio, &mut profile.bio),
            (&self.followers, &mut profile.followers),
            (&self.following, &mut profile.following),
            (&self.posts, &mut profile.posts),
            (&self.avatar, &mut profile.avatar),
            (&self.email, &mut profile.email),
            (&self.phone, &mut profile.phone),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}
