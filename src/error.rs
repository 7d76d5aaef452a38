// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing alerts.

/// Application error type.
///
/// Every failure is scoped to a single operation; callers convert it to one
/// alert via [`AppError::user_message`] and log the detail.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Alert shown for any backend or transport failure.
    pub const GENERIC_ALERT: &'static str = "Something went wrong. Please try again.";
    /// Alert shown when an operation needs a signed-in user.
    pub const SIGN_IN_ALERT: &'static str = "Please sign in to continue.";

    /// The text shown to the user for this error.
    ///
    /// Validation messages are local and safe to display; everything else
    /// collapses to a generic alert so backend detail never reaches the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthenticated => Self::SIGN_IN_ALERT.to_string(),
            AppError::Auth(_) => "Sign in failed. Check your email and password.".to_string(),
            AppError::NotFound(_)
            | AppError::StoreUnavailable(_)
            | AppError::Write(_)
            | AppError::Delete(_)
            | AppError::Upload(_)
            | AppError::Internal(_) => Self::GENERIC_ALERT.to_string(),
        }
    }

    /// Transport or backend failures the user can simply retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::StoreUnavailable(_)
                | AppError::Write(_)
                | AppError::Delete(_)
                | AppError::Upload(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl AppError {
    /// Validation failure reported for the first failing field in `order`.
    ///
    /// Fields missing from `order` come after it, sorted by name.
    pub fn from_validation(errors: validator::ValidationErrors, order: &[&str]) -> Self {
        let rank = |field: &str| order.iter().position(|f| *f == field).unwrap_or(order.len());
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| rank(&a.0).cmp(&rank(&b.0)).then_with(|| a.0.cmp(&b.0)));

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |e| (field.clone(), e)))
            .next()
            .map(|(field, e)| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::Validation(message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Map iteration order is unstable; sort so the alert is deterministic.
        AppError::from_validation(errors, &[])
    }
}

/// Result type alias for adapter and form operations
pub type Result<T> = std::result::Result<T, AppError>;
