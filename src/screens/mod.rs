// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-view controllers.
//!
//! A screen owns its [`ViewScope`](crate::sync::ViewScope), its subscriptions
//! and its forms. Every adapter call made from a screen is settled here: the
//! error is logged and turned into the screen's single alert.

pub mod auth;
pub mod home;
pub mod profile;

pub use auth::{refresh_session, sign_out, LoginScreen, RegisterScreen};
pub use home::ContactsScreen;
pub use profile::ProfileScreen;

use crate::error::{AppError, Result};

/// Settle a non-form action: log the failure and keep its alert.
pub(crate) fn settle<R>(alert: &mut Option<String>, action: &str, outcome: Result<R>) -> Result<R> {
    match outcome {
        Ok(value) => {
            *alert = None;
            Ok(value)
        }
        Err(e) => {
            if matches!(e, AppError::Validation(_)) {
                tracing::warn!(action, error = %e, "Action rejected");
            } else {
                tracing::error!(action, error = %e, "Action failed");
            }
            *alert = Some(e.user_message());
            Err(e)
        }
    }
}
