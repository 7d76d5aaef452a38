// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session and the client context threaded into every call.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from a backend-issued ID token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Owning-user identifier stamped on every record this user writes
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from the tokens returned by the identity provider.
    ///
    /// The ID token's signature is the backend's concern; the client only
    /// reads the subject and expiry from it.
    pub fn from_tokens(id_token: &str, refresh_token: &str) -> Result<Self> {
        let claims = read_claims(id_token)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Auth("ID token has an invalid expiry".to_string()))?;

        Ok(Self {
            uid: claims.sub,
            email: claims.email.unwrap_or_default(),
            id_token: id_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

fn read_claims(id_token: &str) -> Result<IdTokenClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false; // Expiry is checked against the session, not here
    validation.validate_aud = false;

    decode::<IdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(format!("Malformed ID token: {}", e)))
}

/// Per-client context passed explicitly into every adapter call.
///
/// Replaces a process-wide "current user": whoever holds the context decides
/// which session the call runs under.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    session: Option<Session>,
}

impl ClientContext {
    /// Context with no signed-in user.
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replace the session (sign in, refresh).
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop the session (sign out).
    pub fn clear(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// The active session, or `Unauthenticated` if there is none or it expired.
    pub fn require_session(&self) -> Result<&Session> {
        match &self.session {
            Some(session) if !session.is_expired_at(Utc::now()) => Ok(session),
            Some(session) => {
                tracing::debug!(uid = %session.uid, "Session expired");
                Err(AppError::Unauthenticated)
            }
            None => Err(AppError::Unauthenticated),
        }
    }
}
