//! Fixed icon catalogs offered by the profile forms.

/// Icon choice for a social link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialIcon {
    pub name: &'static str,
    pub label: &'static str,
}

/// Preset for a new activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityType {
    pub icon: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

pub static SOCIAL_ICONS: [SocialIcon; 6] = [
    SocialIcon { name: "github", label: "GitHub" },
    SocialIcon { name: "linkedin-square", label: "LinkedIn" },
    SocialIcon { name: "twitter", label: "Twitter" },
    SocialIcon { name: "facebook-square", label: "Facebook" },
    SocialIcon { name: "instagram", label: "Instagram" },
    SocialIcon { name: "link", label: "Website" },
];

pub static ACTIVITY_TYPES: [ActivityType; 6] = [
    ActivityType { icon: "code", color: "#60a5fa", label: "Code" },
    ActivityType { icon: "heart", color: "#ef4444", label: "Like" },
    ActivityType { icon: "message-square", color: "#10b981", label: "Comment" },
    ActivityType { icon: "share-2", color: "#f59e0b", label: "Share" },
    ActivityType { icon: "star", color: "#8b5cf6", label: "Star" },
    ActivityType { icon: "bookmark", color: "#06b6d4", label: "Bookmark" },
];

/// Icon key used when a link has no explicit icon.
pub const DEFAULT_SOCIAL_ICON: &str = "link";
/// Icon and color for an activity created without a preset.
pub const DEFAULT_ACTIVITY_ICON: &str = "activity";
pub const DEFAULT_ACTIVITY_COLOR: &str = "#60a5fa";

/// Look up the activity preset for an icon key.
pub fn activity_type(icon: &str) -> Option<&'static ActivityType> {
    ACTIVITY_TYPES.iter().find(|t| t.icon == icon)
}
