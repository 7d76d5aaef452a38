// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod catalog;
pub mod contact;
pub mod profile;
pub mod social_link;

pub use activity::{Activity, ActivityPatch};
pub use contact::{generate_avatar, Contact, ContactPatch, ContactStatus};
pub use profile::{ProfilePatch, UserProfile};
pub use social_link::{SocialLink, SocialLinkPatch};
