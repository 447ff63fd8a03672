//! Boundary to the host's session store.
//!
//! The host owns two things this crate reads:
//! - a key-value metadata map, of which one key holds the encoded deck
//! - the list of scene items, some of which carry `CharacterMeta`
//!
//! Both push change notifications through `subscribe`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::registry::CharacterMeta;

/// One item from the host's item feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Host identifier of the item.
    pub item_id: String,

    /// Initiative metadata, present once the character was added.
    #[serde(default)]
    pub meta: Option<CharacterMeta>,
}

impl ItemRecord {
    /// An item that is not part of initiative.
    pub fn bare(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            meta: None,
        }
    }

    /// An item carrying initiative metadata.
    pub fn with_meta(item_id: impl Into<String>, meta: CharacterMeta) -> Self {
        Self {
            item_id: item_id.into(),
            meta: Some(meta),
        }
    }
}

/// Change notification from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// The deck key changed; `None` when it was deleted.
    MetaChanged(Option<Vec<u8>>),
    /// The item feed changed.
    ItemsChanged(Vec<ItemRecord>),
}

/// Shared session store.
///
/// Writes replace the value atomically. Calls may be slow or fail; a failed
/// call is treated as not having happened.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the value under `key`, `None` when absent.
    async fn fetch_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value under `key`.
    async fn publish_meta(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Read the current item feed.
    async fn fetch_items(&self) -> Result<Vec<ItemRecord>, StoreError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
