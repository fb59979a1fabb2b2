use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// In-process whole-response cache for the home listing, keyed by request
/// path + query. Entries expire lazily after a fixed TTL; mutations never
/// invalidate them. The only eager invalidation is the operator's explicit
/// `clear`, so readers may see stale content for up to one TTL.
pub struct PageCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    body: String,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.body.clone())
    }

    pub fn put(&self, key: String, body: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    body,
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn hit_within_ttl_returns_stored_body() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/?page=1".into(), "body-a".into());
        assert_eq!(cache.get("/?page=1").as_deref(), Some("body-a"));
    }

    #[test]
    fn stale_body_survives_until_expiry_not_until_mutation() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/".into(), "before-edit".into());
        // The underlying post changed, but the cache keeps serving the old
        // render until TTL or an explicit clear.
        assert_eq!(cache.get("/").as_deref(), Some("before-edit"));
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = PageCache::new(Duration::from_millis(20));
        cache.put("/".into(), "body".into());
        sleep(Duration::from_millis(40));
        assert_eq!(cache.get("/"), None);
    }

    #[test]
    fn clear_drops_everything_immediately() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/".into(), "body".into());
        cache.put("/?page=2".into(), "body2".into());
        cache.clear();
        assert_eq!(cache.get("/"), None);
        assert_eq!(cache.get("/?page=2"), None);
    }

    #[test]
    fn keys_are_independent() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/?page=1".into(), "one".into());
        cache.put("/?page=2".into(), "two".into());
        assert_eq!(cache.get("/?page=1").as_deref(), Some("one"));
        assert_eq!(cache.get("/?page=2").as_deref(), Some("two"));
    }
}
