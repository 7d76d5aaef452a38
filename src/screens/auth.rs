// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, registration and sign-out.

use crate::error::{AppError, Result};
use crate::forms::{Form, LoginDraft, RegisterDraft};
use crate::services::IdentityProvider;
use crate::session::ClientContext;
use crate::sync::SubscriptionRegistry;

/// Login form. The identity provider is only called with a valid draft.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub form: Form<LoginDraft>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign in and store the session in `ctx`.
    pub async fn submit(
        &mut self,
        identity: &dyn IdentityProvider,
        ctx: &mut ClientContext,
    ) -> Result<()> {
        let session = self
            .form
            .submit(|draft| async move {
                identity
                    .authenticate(draft.email.trim(), &draft.password)
                    .await
            })
            .await?;

        tracing::info!(uid = %session.uid, "Signed in");
        ctx.set_session(session);
        Ok(())
    }
}

/// Account registration form.
#[derive(Debug, Default)]
pub struct RegisterScreen {
    pub form: Form<RegisterDraft>,
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the account; the new user is signed in on success.
    pub async fn submit(
        &mut self,
        identity: &dyn IdentityProvider,
        ctx: &mut ClientContext,
    ) -> Result<()> {
        let session = self
            .form
            .submit(|draft| async move {
                identity.register(draft.email.trim(), &draft.password).await
            })
            .await?;

        tracing::info!(uid = %session.uid, "Account registered");
        ctx.set_session(session);
        Ok(())
    }
}

/// Drop the session and tear down every open subscription.
pub fn sign_out(ctx: &mut ClientContext, subscriptions: &SubscriptionRegistry) {
    let open = subscriptions.active_count();
    subscriptions.close_all();
    match ctx.clear() {
        Some(session) => tracing::info!(uid = %session.uid, closed = open, "Signed out"),
        None => tracing::debug!("Sign out without a session"),
    }
}

/// Replace the session in `ctx` with a freshly issued one.
pub async fn refresh_session(
    identity: &dyn IdentityProvider,
    ctx: &mut ClientContext,
) -> Result<()> {
    let current = ctx.session().cloned().ok_or(AppError::Unauthenticated)?;
    let refreshed = identity.refresh(&current).await.inspect_err(|e| {
        tracing::warn!(uid = %current.uid, error = %e, "Session refresh failed");
    })?;

    tracing::debug!(uid = %refreshed.uid, expires_at = %refreshed.expires_at, "Session refreshed");
    ctx.set_session(refreshed);
    Ok(())
}
