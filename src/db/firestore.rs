// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the [`DocumentStore`] operations for every [`Record`] type:
//! - Contacts
//! - User profiles (keyed by user ID)
//! - Social links
//! - Activities
//!
//! Change notification comes from a Firestore listen stream per collection,
//! with a slow periodic tick as a resync fallback. Subscribers only see a new
//! snapshot when the visible collection actually differs.

use crate::db::{DocumentStore, FieldMap, Record, OWNER_FIELD};
use crate::error::AppError;
use async_trait::async_trait;
use firestore::{FirestoreListenEvent, FirestoreListenerTarget, FirestoreMemListenStateStorage};
use futures_util::stream::{self, BoxStream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Every listener watches a single collection, so one target ID suffices.
const LISTEN_TARGET_ID: u32 = 1;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    poll_interval: Duration,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, poll_interval: Duration) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, poll_interval).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            poll_interval,
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        poll_interval: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            poll_interval,
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            poll_interval: Duration::from_secs(1),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::StoreUnavailable("Database not connected (offline mode)".to_string())
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    async fn get<T: Record>(&self, id: &str) -> Result<Option<T>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(T::COLLECTION)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    async fn list<T: Record>(&self, owner_id: &str) -> Result<Vec<T>, AppError> {
        let owner = owner_id.to_string();
        let records: Vec<T> = self
            .get_client()?
            .fluent()
            .select()
            .from(T::COLLECTION)
            .filter(move |q| q.for_all([q.field(OWNER_FIELD).eq(owner.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;

        // Access control lives in the backend's rules; never surface a foreign
        // document even if the query returned one.
        Ok(records
            .into_iter()
            .filter(|r| r.owner_id() == owner_id)
            .collect())
    }

    async fn set<T: Record>(&self, record: &T) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(T::COLLECTION)
            .document_id(record.id())
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;
        Ok(())
    }

    async fn merge<T: Record>(&self, id: &str, fields: FieldMap) -> Result<(), AppError> {
        // Only the supplied paths are written; everything else is preserved.
        let paths: Vec<String> = fields.keys().cloned().collect();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths)
            .in_col(T::COLLECTION)
            .document_id(id)
            .object(&fields)
            .execute()
            .await
            .map_err(|e| AppError::Write(e.to_string()))?;
        Ok(())
    }

    async fn delete<T: Record>(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(T::COLLECTION)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Delete(e.to_string()))?;
        Ok(())
    }

    fn changes<T: Record>(&self) -> BoxStream<'static, ()> {
        let Some(client) = self.client.clone() else {
            return stream::empty().boxed();
        };

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(listen_collection(client, T::COLLECTION, tx));
        let pushed = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|()| ((), rx)) });

        let period = self.poll_interval;
        let interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        let resync = stream::unfold(interval, |mut interval| async move {
            interval.tick().await;
            Some(((), interval))
        });

        stream::select(pushed, resync).boxed()
    }
}

/// Forward document changes in `collection` to `tx` until its receiver is
/// dropped, then shut the listener down.
async fn listen_collection(
    client: firestore::FirestoreDb,
    collection: &'static str,
    tx: mpsc::UnboundedSender<()>,
) {
    let mut listener = match client
        .create_listener(FirestoreMemListenStateStorage::new())
        .await
    {
        Ok(listener) => listener,
        Err(e) => {
            tracing::warn!(collection, error = %e, "Failed to create change listener");
            return;
        }
    };

    if let Err(e) = client
        .fluent()
        .select()
        .from(collection)
        .listen()
        .add_target(FirestoreListenerTarget::new(LISTEN_TARGET_ID), &mut listener)
    {
        tracing::warn!(collection, error = %e, "Failed to add listener target");
        return;
    }

    let events = tx.clone();
    let started = listener
        .start(move |event| {
            let events = events.clone();
            async move {
                if matches!(
                    event,
                    FirestoreListenEvent::DocumentChange(_)
                        | FirestoreListenEvent::DocumentDelete(_)
                        | FirestoreListenEvent::DocumentRemove(_)
                ) {
                    // Receiver gone means the subscription ended; shutdown follows.
                    let _ = events.send(());
                }
                Ok(())
            }
        })
        .await;
    if let Err(e) = started {
        tracing::warn!(collection, error = %e, "Failed to start change listener");
        return;
    }
    tracing::debug!(collection, "Change listener started");

    tx.closed().await;
    if let Err(e) = listener.shutdown().await {
        tracing::warn!(collection, error = %e, "Failed to shut down change listener");
    }
}
