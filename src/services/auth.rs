// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (email/password accounts).
//!
//! Handles:
//! - Sign in with email and password
//! - Account registration
//! - ID token refresh

use crate::config::Config;
use crate::error::AppError;
use crate::session::Session;
use async_trait::async_trait;
use serde::Deserialize;

/// External authentication collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in an existing account.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Create a new account and sign it in.
    async fn register(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Exchange the session's refresh token for a fresh ID token.
    async fn refresh(&self, session: &Session) -> Result<Session, AppError>;
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    secure_token_url: String,
    api_key: String,
}

/// Response from `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    id_token: String,
    refresh_token: String,
}

/// Response from the secure token endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.auth_base_url.clone(),
            secure_token_url: config.secure_token_url.clone(),
            api_key: config.firebase_api_key.clone(),
        }
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Auth request failed: {}", e)))?;

        let tokens: PasswordAuthResponse = check_response_json(response).await?;
        Session::from_tokens(&tokens.id_token, &tokens.refresh_token)
    }
}

#[async_trait]
impl IdentityProvider for AuthClient {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let session = self
            .password_request("signInWithPassword", email, password)
            .await?;
        tracing::info!(uid = %session.uid, "Signed in");
        Ok(session)
    }

    async fn register(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let session = self.password_request("signUp", email, password).await?;
        tracing::info!(uid = %session.uid, "Account registered");
        Ok(session)
    }

    async fn refresh(&self, session: &Session) -> Result<Session, AppError> {
        let response = self
            .http
            .post(&self.secure_token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Token refresh request failed: {}", e)))?;

        let tokens: RefreshResponse = check_response_json(response).await?;
        let refreshed = Session::from_tokens(&tokens.id_token, &tokens.refresh_token)?;
        tracing::debug!(uid = %refreshed.uid, "Session refreshed");
        Ok(refreshed)
    }
}

/// Check response status and parse the JSON body.
///
/// Client errors carry the provider's error code (e.g. `INVALID_PASSWORD`).
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| AppError::Auth(format!("Unexpected auth response: {}", e)));
    }

    let body = response.text().await.unwrap_or_default();
    if status.is_client_error() {
        let code = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        return Err(AppError::Auth(code));
    }

    Err(AppError::StoreUnavailable(format!("HTTP {}: {}", status, body)))
}
