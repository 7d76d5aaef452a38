// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Contact model for storage and views.

use serde::{Deserialize, Serialize};

/// Presence shown next to a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Online,
    Offline,
}

/// Contact record stored in the `contacts` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    /// Document ID (assigned on create)
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Two uppercase initials derived from the name at write time
    pub avatar: String,
    pub is_favorite: bool,
    /// Free text or date string
    pub last_contact: String,
    pub status: ContactStatus,
    pub address: String,
    pub birthday: String,
    pub company: String,
    /// Owning user's ID
    #[serde(rename = "uId")]
    pub owner_id: String,
}

/// Partial contact for merge-writes. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ContactPatch {
    /// Trim the free-text fields the same way a new contact is trimmed.
    pub fn trimmed(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.phone,
            &mut self.email,
            &mut self.address,
            &mut self.company,
        ] {
            if let Some(value) = field.as_mut() {
                *value = value.trim().to_string();
            }
        }
        self
    }

    /// Keep `avatar` consistent with a renamed contact.
    pub fn with_derived_avatar(mut self) -> Self {
        if let Some(name) = &self.name {
            self.avatar = Some(generate_avatar(name));
        }
        self
    }
}

/// Derive the two-letter avatar from a contact name.
///
/// Two or more words give the first letter of the first two words; a single
/// word gives its first two characters. The result is uppercased.
pub fn generate_avatar(name: &str) -> String {
    let mut words = name.split_whitespace();
    let initials: String = match (words.next(), words.next()) {
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect(),
        (Some(only), None) => only.chars().take(2).collect(),
        _ => String::new(),
    };
    initials.to_uppercase()
}
