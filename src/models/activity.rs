// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Profile activity feed model.

use serde::{Deserialize, Serialize};

/// Activity entry shown on the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub id: String,
    /// Category ("code", "star", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Icon key, see [`crate::models::catalog::ACTIVITY_TYPES`]
    pub icon: String,
    /// Accent color ("#60a5fa")
    pub color: String,
    /// Day of the activity (YYYY-MM-DD), defaults to the creation day
    pub date: String,
    #[serde(rename = "uId")]
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Partial activity for merge-writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
