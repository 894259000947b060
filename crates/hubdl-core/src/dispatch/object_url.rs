//! In-memory `blob:` URL table.
//!
//! Shells without a native object-URL facility keep fetched bodies here
//! between the download trigger and the revoke. Counters let callers check
//! that every created URL is revoked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::shell::ShellError;

/// Prefix of URLs handed out by [`ObjectUrlRegistry::create`].
pub const OBJECT_URL_PREFIX: &str = "blob:hubdl/";

#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    next_id: AtomicU64,
    live: Mutex<HashMap<String, Arc<[u8]>>>,
    created: AtomicUsize,
    revoked: AtomicUsize,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, body: Vec<u8>) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let url = format!("{}{}", OBJECT_URL_PREFIX, id);
        self.table().insert(url.clone(), Arc::from(body));
        self.created.fetch_add(1, Ordering::Relaxed);
        url
    }

    /// Bytes behind a live object URL.
    pub fn get(&self, url: &str) -> Option<Arc<[u8]>> {
        self.table().get(url).cloned()
    }

    /// Releases `url`. Revoking an unknown or already revoked URL is an error.
    pub fn revoke(&self, url: &str) -> Result<(), ShellError> {
        match self.table().remove(url) {
            Some(_) => {
                self.revoked.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(ShellError::UnknownObjectUrl(url.to_string())),
        }
    }

    pub fn is_object_url(url: &str) -> bool {
        url.starts_with(OBJECT_URL_PREFIX)
    }

    pub fn live_count(&self) -> usize {
        self.table().len()
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.load(Ordering::Relaxed)
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_revoke() {
        let reg = ObjectUrlRegistry::new();
        let url = reg.create(b"%PDF-1.4".to_vec());
        assert!(ObjectUrlRegistry::is_object_url(&url));
        assert_eq!(reg.get(&url).as_deref(), Some(&b"%PDF-1.4"[..]));
        assert_eq!(reg.live_count(), 1);

        reg.revoke(&url).unwrap();
        assert!(reg.get(&url).is_none());
        assert_eq!(reg.live_count(), 0);
        assert_eq!((reg.created_count(), reg.revoked_count()), (1, 1));
    }

    #[test]
    fn urls_are_unique() {
        let reg = ObjectUrlRegistry::new();
        let a = reg.create(Vec::new());
        let b = reg.create(Vec::new());
        assert_ne!(a, b);
    }

    #[test]
    fn double_revoke_is_an_error() {
        let reg = ObjectUrlRegistry::new();
        let url = reg.create(vec![1, 2, 3]);
        reg.revoke(&url).unwrap();
        assert_eq!(reg.revoke(&url), Err(ShellError::UnknownObjectUrl(url)));
        assert_eq!(reg.revoked_count(), 1);
    }
}
