// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use contact_keeper::config::Config;
use contact_keeper::db::{DocumentStore, FieldMap, FirestoreDb, MemoryStore, Record};
use contact_keeper::error::{AppError, Result as StoreResult};
use futures_util::stream::BoxStream;
use contact_keeper::services::{IdentityProvider, ObjectStorage};
use contact_keeper::session::{ClientContext, IdTokenClaims, Session};
use contact_keeper::AppState;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", Duration::from_millis(50))
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// ID token as the identity provider would issue it (signature not checked).
pub fn id_token(uid: &str, expires_in_secs: i64) -> String {
    let claims = IdTokenClaims {
        sub: uid.to_string(),
        exp: chrono::Utc::now().timestamp() + expires_in_secs,
        email: Some(format!("{}@example.com", uid)),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-signing-key"),
    )
    .unwrap()
}

pub fn test_session(uid: &str) -> Session {
    Session::from_tokens(&id_token(uid, 3600), &format!("refresh-{}", uid)).unwrap()
}

#[allow(dead_code)]
pub fn signed_in(uid: &str) -> ClientContext {
    ClientContext::signed_in(test_session(uid))
}

/// Identity provider accepting one password for every email. Counts calls.
#[derive(Default)]
pub struct FakeIdentity {
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeIdentity {
    pub const PASSWORD: &'static str = "secret123";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn uid_for(email: &str) -> String {
        email.split('@').next().unwrap_or_default().to_string()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if password != Self::PASSWORD {
            return Err(AppError::Auth("INVALID_LOGIN_CREDENTIALS".to_string()));
        }
        Ok(test_session(&Self::uid_for(email)))
    }

    async fn register(&self, email: &str, _password: &str) -> Result<Session, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(test_session(&Self::uid_for(email)))
    }

    async fn refresh(&self, session: &Session) -> Result<Session, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Session::from_tokens(&id_token(&session.uid, 7200), &session.refresh_token)
    }
}

/// Object storage that remembers uploads.
#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(
        &self,
        _session: &Session,
        path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(format!(
            "https://storage.test/b/bucket/o/{}?alt=media",
            urlencoding::encode(path)
        ))
    }

    async fn delete(&self, _session: &Session, url: &str) -> Result<(), AppError> {
        self.deletes.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// App wired to the in-memory store and fake collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub state: AppState<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub storage: Arc<FakeStorage>,
}

#[allow(dead_code)]
pub fn test_app() -> TestApp {
    let identity = Arc::new(FakeIdentity::default());
    let storage = Arc::new(FakeStorage::default());
    let state = AppState::new(
        Config::default(),
        MemoryStore::new(),
        identity.clone(),
        storage.clone(),
    );
    TestApp {
        state,
        identity,
        storage,
    }
}

/// Memory store whose full-document writes wait to be released.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct GatedStore {
    pub inner: MemoryStore,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[allow(dead_code)]
impl GatedStore {
    /// Resolves once a write is parked at the gate.
    pub async fn write_pending(&self) {
        self.entered.notified().await;
    }

    /// Let the parked write through.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn get<T: Record>(&self, id: &str) -> StoreResult<Option<T>> {
        self.inner.get(id).await
    }

    async fn list<T: Record>(&self, owner_id: &str) -> StoreResult<Vec<T>> {
        self.inner.list(owner_id).await
    }

    async fn set<T: Record>(&self, record: &T) -> StoreResult<()> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.set(record).await
    }

    async fn merge<T: Record>(&self, id: &str, fields: FieldMap) -> StoreResult<()> {
        self.inner.merge::<T>(id, fields).await
    }

    async fn delete<T: Record>(&self, id: &str) -> StoreResult<()> {
        self.inner.delete::<T>(id).await
    }

    fn changes<T: Record>(&self) -> BoxStream<'static, ()> {
        self.inner.changes::<T>()
    }
}

/// Fail the test instead of hanging when a push never arrives.
#[allow(dead_code)]
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("Timed out waiting for snapshot")
}
