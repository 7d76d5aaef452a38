// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Binary object storage client (profile images).

use crate::config::Config;
use crate::error::AppError;
use crate::session::Session;
use async_trait::async_trait;
use serde::Deserialize;

/// External object storage collaborator.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes to `path` and return a download URL.
    async fn upload(
        &self,
        session: &Session,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;

    /// Delete the object behind a download URL.
    async fn delete(&self, session: &Session, url: &str) -> Result<(), AppError>;
}

/// Storage REST client.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
}

/// Object metadata returned after an upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

impl StorageClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.storage_base_url.clone(),
            bucket: config.storage_bucket.clone(),
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(name)
        )
    }

    /// Public download URL for an uploaded object.
    pub fn download_url(&self, name: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("{}?alt=media&token={}", self.object_url(name), token),
            None => format!("{}?alt=media", self.object_url(name)),
        }
    }
}

/// Extract the object path from a download URL (`.../o/<encoded>?alt=media`).
pub fn object_name_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/o/")?;
    let encoded = rest.split('?').next()?;
    if encoded.is_empty() {
        return None;
    }
    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}

#[async_trait]
impl ObjectStorage for StorageClient {
    async fn upload(
        &self,
        session: &Session,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);
        let size = bytes.len();

        let response = self
            .http
            .post(&url)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(reqwest::header::AUTHORIZATION, format!("Firebase {}", session.id_token))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!("HTTP {}: {}", status, body)));
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Unexpected upload response: {}", e)))?;

        tracing::info!(path, size, "Object uploaded");
        Ok(self.download_url(&metadata.name, metadata.download_tokens.as_deref()))
    }

    async fn delete(&self, session: &Session, url: &str) -> Result<(), AppError> {
        let name = object_name_from_url(url)
            .ok_or_else(|| AppError::Validation(format!("Not a storage URL: {}", url)))?;

        let response = self
            .http
            .delete(self.object_url(&name))
            .header(reqwest::header::AUTHORIZATION, format!("Firebase {}", session.id_token))
            .send()
            .await
            .map_err(|e| AppError::Delete(e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {
                tracing::info!(name = %name, "Object deleted");
                Ok(())
            }
            404 => Err(AppError::NotFound(format!("Object {}", name))),
            _ => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Delete(format!("HTTP {}: {}", status, body)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_round_trips_object_name() {
        let client = StorageClient::new(&Config::default());
        let url = client.download_url("profile_images/1700000000000.jpg", Some("tok"));

        assert!(url.contains("/o/profile_images%2F1700000000000.jpg?alt=media&token=tok"));
        assert_eq!(
            object_name_from_url(&url).as_deref(),
            Some("profile_images/1700000000000.jpg")
        );
    }

    #[test]
    fn test_non_storage_url_has_no_object_name() {
        assert_eq!(object_name_from_url("https://example.com/avatar.png"), None);
    }
}
