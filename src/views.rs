//! Derived view computations.
//!
//! Pure functions over the last pushed snapshot plus transient UI state
//! (search text, active tab).

use crate::error::AppError;
use crate::models::{Activity, Contact, ContactStatus};
use std::str::FromStr;

/// Contact list tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    All,
    Favorites,
    /// Same rows as `All`; no recency ordering is applied.
    // TODO: order by lastContact once its free-text format is pinned down.
    Recent,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Favorites => "favorites",
            Tab::Recent => "recent",
        }
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "favorites" => Ok(Tab::Favorites),
            "recent" => Ok(Tab::Recent),
            other => Err(AppError::Validation(format!("Unknown tab: {}", other))),
        }
    }
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// True when `query` looks like (part of) a phone number.
fn is_phone_query(query: &str) -> bool {
    query.chars().any(|c| c.is_ascii_digit())
        && query
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')' | '.'))
}

fn matches_query(contact: &Contact, query: &str) -> bool {
    let needle = query.to_lowercase();
    if contact.name.to_lowercase().contains(&needle)
        || contact.email.to_lowercase().contains(&needle)
        || contact.phone.contains(query)
    {
        return true;
    }
    // "5551234" finds "555-1234" and vice versa
    is_phone_query(query) && digits(&contact.phone).contains(&digits(query))
}

/// Contacts visible for the search text and tab, in snapshot order.
///
/// An empty query with [`Tab::All`] returns the whole snapshot.
pub fn filtered_contacts<'a>(contacts: &'a [Contact], query: &str, tab: Tab) -> Vec<&'a Contact> {
    let query = query.trim();
    contacts
        .iter()
        .filter(|c| query.is_empty() || matches_query(c, query))
        .filter(|c| match tab {
            Tab::Favorites => c.is_favorite,
            Tab::All | Tab::Recent => true,
        })
        .collect()
}

/// Header counters for the contact list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    pub total: usize,
    pub favorites: usize,
    pub online: usize,
}

pub fn stats(contacts: &[Contact]) -> ContactStats {
    contacts.iter().fold(ContactStats::default(), |mut acc, c| {
        acc.total += 1;
        if c.is_favorite {
            acc.favorites += 1;
        }
        if c.status == ContactStatus::Online {
            acc.online += 1;
        }
        acc
    })
}

/// Activities sorted newest first by creation timestamp.
///
/// Activities without a creation timestamp fall back to their date; ties keep
/// snapshot order.
pub fn activities_newest_first(activities: &[Activity]) -> Vec<&Activity> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by(|a, b| {
        b.created_at
            .as_deref()
            .unwrap_or(b.date.as_str())
            .cmp(a.created_at.as_deref().unwrap_or(a.date.as_str()))
    });
    sorted
}

fn dialable(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// `tel:` link for the call button.
pub fn dial_uri(phone: &str) -> String {
    format!("tel:{}", dialable(phone))
}

/// `sms:` link for the message button.
pub fn sms_uri(phone: &str) -> String {
    format!("sms:{}", dialable(phone))
}

/// `mailto:` link, or `None` when the contact has no email.
pub fn mailto_uri(email: &str) -> Option<String> {
    let email = email.trim();
    (!email.is_empty()).then(|| format!("mailto:{}", email))
}
