//! In-process document store.
//!
//! Documents are held as JSON values per collection and every write is
//! broadcast to subscribers immediately. Used for offline runs and tests.

use crate::db::{DocumentStore, FieldMap, Record, OWNER_FIELD};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// In-memory document store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    /// collection -> (document id -> document)
    collections: DashMap<&'static str, BTreeMap<String, serde_json::Value>>,
    changes: broadcast::Sender<&'static str>,
    offline: AtomicBool,
    write_calls: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                collections: DashMap::new(),
                changes,
                offline: AtomicBool::new(false),
                write_calls: AtomicU64::new(0),
            }),
        }
    }

    /// Simulate losing (or regaining) the connection to the backend.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of write/merge/delete calls that reached the store.
    pub fn write_calls(&self) -> u64 {
        self.inner.write_calls.load(Ordering::SeqCst)
    }

    /// Raw document, as the backend would hold it.
    pub fn raw_document(&self, collection: &str, id: &str) -> Option<serde_json::Value> {
        self.inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
    }

    fn check_online(&self, err: fn(String) -> AppError) -> Result<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(err("Store offline".to_string()));
        }
        Ok(())
    }

    fn notify(&self, collection: &'static str) {
        // No receivers is fine: nobody is subscribed yet.
        let _ = self.inner.changes.send(collection);
    }

    fn decode<T: Record>(id: &str, value: &serde_json::Value) -> Option<T> {
        let mut value = value.clone();
        // Documents created by a merge carry no `id` field of their own.
        if let Some(fields) = value.as_object_mut() {
            fields
                .entry("id")
                .or_insert_with(|| serde_json::Value::String(id.to_string()));
        }
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection = T::COLLECTION,
                    id,
                    error = %e,
                    "Skipping undecodable document"
                );
                None
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get<T: Record>(&self, id: &str) -> Result<Option<T>> {
        self.check_online(AppError::StoreUnavailable)?;
        Ok(self
            .inner
            .collections
            .get(T::COLLECTION)
            .and_then(|docs| docs.get(id).and_then(|v| Self::decode(id, v))))
    }

    async fn list<T: Record>(&self, owner_id: &str) -> Result<Vec<T>> {
        self.check_online(AppError::StoreUnavailable)?;
        let Some(docs) = self.inner.collections.get(T::COLLECTION) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, v)| v.get(OWNER_FIELD).and_then(|o| o.as_str()) == Some(owner_id))
            .filter_map(|(id, v)| Self::decode(id, v))
            .collect())
    }

    async fn set<T: Record>(&self, record: &T) -> Result<()> {
        self.check_online(AppError::Write)?;
        self.inner.write_calls.fetch_add(1, Ordering::SeqCst);
        let value = serde_json::to_value(record)
            .map_err(|e| AppError::Write(format!("Failed to encode document: {}", e)))?;
        self.inner
            .collections
            .entry(T::COLLECTION)
            .or_default()
            .insert(record.id().to_string(), value);
        self.notify(T::COLLECTION);
        Ok(())
    }

    async fn merge<T: Record>(&self, id: &str, fields: FieldMap) -> Result<()> {
        self.check_online(AppError::Write)?;
        self.inner.write_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut docs = self.inner.collections.entry(T::COLLECTION).or_default();
            let doc = docs
                .entry(id.to_string())
                .or_insert_with(|| serde_json::Value::Object(FieldMap::new()));
            match doc.as_object_mut() {
                Some(existing) => existing.extend(fields),
                None => *doc = serde_json::Value::Object(fields),
            }
        }
        self.notify(T::COLLECTION);
        Ok(())
    }

    async fn delete<T: Record>(&self, id: &str) -> Result<()> {
        self.check_online(AppError::Delete)?;
        self.inner.write_calls.fetch_add(1, Ordering::SeqCst);
        let removed = self
            .inner
            .collections
            .get_mut(T::COLLECTION)
            .and_then(|mut docs| docs.remove(id))
            .is_some();
        if removed {
            self.notify(T::COLLECTION);
        }
        Ok(())
    }

    fn changes<T: Record>(&self) -> BoxStream<'static, ()> {
        let rx = self.inner.changes.subscribe();
        stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(collection) if collection == T::COLLECTION => return Some(((), rx)),
                    Ok(_) => continue,
                    // Missed notifications: a re-read catches up.
                    Err(broadcast::error::RecvError::Lagged(_)) => return Some(((), rx)),
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}
