//! In-memory `SessionStore` shared by clones.
//!
//! Stands in for the host when testing several controllers against one
//! store. Failure switches let tests exercise the error paths.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::broadcast;

use super::store::{ItemRecord, SessionStore, StoreEvent};
use crate::error::StoreError;
use crate::registry::CharacterMeta;

const EVENT_CAPACITY: usize = 64;

/// In-memory session store. Clones share state and notifications.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<StoreEvent>,
}

#[derive(Default)]
struct Inner {
    meta: FxHashMap<String, Vec<u8>>,
    items: Vec<ItemRecord>,
    fail_publish: bool,
    fail_fetch: bool,
    publishes: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            events,
        }
    }

    /// Replace the item feed and notify subscribers.
    pub fn set_items(&self, items: Vec<ItemRecord>) {
        self.inner.lock().items = items.clone();
        let _ = self.events.send(StoreEvent::ItemsChanged(items));
    }

    /// Attach initiative metadata to an item, as the UI layer does, and
    /// notify subscribers. Returns false for an unknown item.
    pub fn write_item_meta(&self, item_id: &str, meta: CharacterMeta) -> bool {
        let items = {
            let mut inner = self.inner.lock();
            let Some(item) = inner.items.iter_mut().find(|item| item.item_id == item_id) else {
                return false;
            };
            item.meta = Some(meta);
            inner.items.clone()
        };
        let _ = self.events.send(StoreEvent::ItemsChanged(items));
        true
    }

    /// Set a raw value without notifying subscribers.
    pub fn insert_raw(&self, key: &str, bytes: Vec<u8>) {
        self.inner.lock().meta.insert(key.to_string(), bytes);
    }

    /// Current raw value under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.lock().meta.get(key).cloned()
    }

    /// Make every publish fail until switched back.
    pub fn set_fail_publish(&self, fail: bool) {
        self.inner.lock().fail_publish = fail;
    }

    /// Make every fetch fail until switched back.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.inner.lock().fail_fetch = fail;
    }

    /// Number of accepted publishes.
    #[must_use]
    pub fn publish_count(&self) -> usize {
        self.inner.lock().publishes
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn fetch_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.inner.lock();
        if inner.fail_fetch {
            return Err(StoreError::Unavailable("fetch disabled".to_string()));
        }
        Ok(inner.meta.get(key).cloned())
    }

    async fn publish_meta(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock();
            if inner.fail_publish {
                return Err(StoreError::Rejected("publish disabled".to_string()));
            }
            inner.meta.insert(key.to_string(), bytes.clone());
            inner.publishes += 1;
        }
        let _ = self.events.send(StoreEvent::MetaChanged(Some(bytes)));
        Ok(())
    }

    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let inner = self.inner.lock();
        if inner.fail_fetch {
            return Err(StoreError::Unavailable("fetch disabled".to_string()));
        }
        Ok(inner.items.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::{CharacterId, PlayerId};

    #[tokio::test]
    async fn test_publish_and_fetch() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        assert_eq!(store.fetch_meta("k").await.unwrap(), None);
        store.publish_meta("k", vec![1, 2]).await.unwrap();

        assert_eq!(store.fetch_meta("k").await.unwrap(), Some(vec![1, 2]));
        assert_eq!(store.publish_count(), 1);
        assert_eq!(
            events.recv().await.unwrap(),
            StoreEvent::MetaChanged(Some(vec![1, 2]))
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.publish_meta("k", vec![9]).await.unwrap();

        assert_eq!(other.raw("k"), Some(vec![9]));
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let store = MemoryStore::new();
        store.set_fail_publish(true);
        assert!(store.publish_meta("k", vec![1]).await.is_err());
        assert_eq!(store.publish_count(), 0);

        store.set_fail_fetch(true);
        assert!(store.fetch_meta("k").await.is_err());
        assert!(store.fetch_items().await.is_err());
    }

    #[tokio::test]
    async fn test_write_item_meta() {
        let store = MemoryStore::new();
        store.set_items(vec![ItemRecord::bare("token-1")]);
        let meta = CharacterMeta::new(CharacterId::new("c1"), PlayerId::new("p1"), "Ada");

        assert!(store.write_item_meta("token-1", meta.clone()));
        assert!(!store.write_item_meta("missing", meta.clone()));

        let items = store.fetch_items().await.unwrap();
        assert_eq!(items[0].meta, Some(meta));
    }
}
