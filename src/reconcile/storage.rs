//! Session-scoped storage for the last handled event id.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::protocol::{EventId, LAST_EVENT_ID_KEY};

/// Key-value string storage shared by the pages of one browsing session.
///
/// Mirrors `sessionStorage`: infallible from the caller's point of view.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }
}

/// In-memory session storage.
///
/// Wrap in `Arc` to share one session between several page instances.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.lock().insert(key.to_string(), value.to_string());
    }
}

/// The last processed event id, written through to session storage.
///
/// Read on every message, never cached: another page of the same session
/// may have written it in the meantime (last write wins).
#[derive(Debug)]
pub struct LastSeenId<S> {
    storage: S,
}

impl<S: SessionStorage> LastSeenId<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Option<EventId> {
        self.storage.get_item(LAST_EVENT_ID_KEY).map(EventId::from)
    }

    /// True when `id` is the one recorded last.
    ///
    /// Nothing recorded never matches, not even the empty id.
    pub fn is_duplicate(&self, id: &EventId) -> bool {
        self.storage
            .get_item(LAST_EVENT_ID_KEY)
            .is_some_and(|seen| seen == id.as_str())
    }

    pub fn record(&self, id: &EventId) {
        self.storage.set_item(LAST_EVENT_ID_KEY, id.as_str());
    }
}
