//! Form drafts: the user's input before it is persisted.

use crate::error::{AppError, Result};
use crate::forms::rules::{
    contact_required, description_required, email_address, link_required, password,
};
use crate::models::catalog::{
    activity_type, DEFAULT_ACTIVITY_COLOR, DEFAULT_ACTIVITY_ICON, DEFAULT_SOCIAL_ICON,
};
use crate::models::{
    generate_avatar, Activity, ActivityPatch, Contact, ContactPatch, ContactStatus, ProfilePatch,
    SocialLink, SocialLinkPatch, UserProfile,
};
use validator::Validate;

/// A draft whose alert names the first failing field in on-screen order.
pub trait FormDraft: Validate {
    /// Validated fields, top to bottom as the form lays them out.
    const FIELD_ORDER: &'static [&'static str];

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| AppError::from_validation(errors, Self::FIELD_ORDER))
    }
}

impl FormDraft for LoginDraft {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

impl FormDraft for RegisterDraft {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password", "confirm_password"];
}

impl FormDraft for ContactDraft {
    const FIELD_ORDER: &'static [&'static str] = &["name", "phone"];
}

impl FormDraft for ProfileDraft {
    const FIELD_ORDER: &'static [&'static str] = &[];
}

impl FormDraft for SocialLinkDraft {
    const FIELD_ORDER: &'static [&'static str] = &["platform", "url"];
}

impl FormDraft for ActivityDraft {
    const FIELD_ORDER: &'static [&'static str] = &["description"];
}

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct LoginDraft {
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[validate(custom(function = "password"))]
    pub password: String,
}

/// Account registration form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct RegisterDraft {
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[validate(custom(function = "password"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

/// Add/edit contact form. An empty `id` means a new contact.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ContactDraft {
    pub id: String,
    #[validate(custom(function = "contact_required"))]
    pub name: String,
    #[validate(custom(function = "contact_required"))]
    pub phone: String,
    pub email: String,
    pub is_favorite: bool,
    pub last_contact: String,
    pub status: ContactStatus,
    pub address: String,
    pub birthday: String,
    pub company: String,
}

impl ContactDraft {
    /// Prefill the form for editing an existing contact.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            is_favorite: contact.is_favorite,
            last_contact: contact.last_contact.clone(),
            status: contact.status,
            address: contact.address.clone(),
            birthday: contact.birthday.clone(),
            company: contact.company.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    /// The record to store: trimmed text fields and derived avatar.
    pub fn to_contact(&self, id: String, owner_id: &str) -> Contact {
        let name = self.name.trim().to_string();
        Contact {
            id,
            avatar: generate_avatar(&name),
            name,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            is_favorite: self.is_favorite,
            last_contact: self.last_contact.clone(),
            status: self.status,
            address: self.address.trim().to_string(),
            birthday: self.birthday.clone(),
            company: self.company.trim().to_string(),
            owner_id: owner_id.to_string(),
        }
    }

    /// Merge-write carrying every form field.
    pub fn to_patch(&self) -> ContactPatch {
        let contact = self.to_contact(String::new(), "");
        ContactPatch {
            name: Some(contact.name),
            phone: Some(contact.phone),
            email: Some(contact.email),
            avatar: Some(contact.avatar),
            is_favorite: Some(contact.is_favorite),
            last_contact: Some(contact.last_contact),
            status: Some(contact.status),
            address: Some(contact.address),
            birthday: Some(contact.birthday),
            company: Some(contact.company),
        }
    }
}

/// Edit-profile form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProfileDraft {
    pub name: String,
    pub username: String,
    pub location: String,
    pub bio: String,
    pub followers: String,
    pub following: String,
    pub posts: String,
    pub avatar: String,
    pub email: String,
    pub phone: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            username: profile.username.clone(),
            location: profile.location.clone(),
            bio: profile.bio.clone(),
            followers: profile.followers.clone(),
            following: profile.following.clone(),
            posts: profile.posts.clone(),
            avatar: profile.avatar.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
        }
    }

    /// Fields to merge. Empty counters and avatar are left to their defaults.
    pub fn to_patch(&self) -> ProfilePatch {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        ProfilePatch {
            name: Some(self.name.trim().to_string()),
            username: Some(self.username.trim().to_string()),
            location: Some(self.location.trim().to_string()),
            bio: Some(self.bio.clone()),
            followers: non_empty(&self.followers),
            following: non_empty(&self.following),
            posts: non_empty(&self.posts),
            avatar: non_empty(&self.avatar),
            email: Some(self.email.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
        }
    }
}

/// Add/edit social link form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SocialLinkDraft {
    #[validate(custom(function = "link_required"))]
    pub platform: String,
    #[validate(custom(function = "link_required"))]
    pub url: String,
    pub icon: String,
}

impl Default for SocialLinkDraft {
    fn default() -> Self {
        Self {
            platform: String::new(),
            url: String::new(),
            icon: DEFAULT_SOCIAL_ICON.to_string(),
        }
    }
}

impl SocialLinkDraft {
    pub fn from_link(link: &SocialLink) -> Self {
        Self {
            platform: link.platform.clone(),
            url: link.url.clone(),
            icon: link.icon.clone(),
        }
    }

    pub fn to_patch(&self) -> SocialLinkPatch {
        SocialLinkPatch {
            platform: Some(self.platform.trim().to_string()),
            url: Some(self.url.trim().to_string()),
            icon: Some(self.icon.clone()),
        }
    }
}

/// Add/edit activity form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ActivityDraft {
    pub kind: String,
    #[validate(custom(function = "description_required"))]
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self {
            kind: String::new(),
            description: String::new(),
            icon: DEFAULT_ACTIVITY_ICON.to_string(),
            color: DEFAULT_ACTIVITY_COLOR.to_string(),
        }
    }
}

impl ActivityDraft {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            kind: activity.kind.clone(),
            description: activity.description.clone(),
            icon: activity.icon.clone(),
            color: activity.color.clone(),
        }
    }

    /// Pick an entry from the activity type catalog.
    pub fn with_type(mut self, icon: &str) -> Self {
        if let Some(t) = activity_type(icon) {
            self.kind = t.icon.to_string();
            self.icon = t.icon.to_string();
            self.color = t.color.to_string();
        }
        self
    }

    pub fn to_patch(&self) -> ActivityPatch {
        ActivityPatch {
            kind: Some(self.kind.clone()),
            description: Some(self.description.trim().to_string()),
            icon: Some(self.icon.clone()),
            color: Some(self.color.clone()),
        }
    }
}
