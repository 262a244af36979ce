//! Process-local cache implementations.

use std::collections::HashMap;

use super::{Cache, Cacheable};

/// Map-backed cache valid for the lifetime of one process.
///
/// `load` and `save` are no-ops, so a fresh process always starts empty and
/// the extractor falls back to rewriting every file once.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Cacheable>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fingerprint recorded for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Cacheable> {
        self.entries.get(key)
    }

    /// Number of recorded keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Cache for MemoryCache {
    fn is_up_to_date(&self, key: &str, candidate: &Cacheable) -> bool {
        self.entries.get(key) == Some(candidate)
    }

    fn put(&mut self, key: &str, value: Cacheable) {
        self.entries.insert(key.to_owned(), value);
    }
}

/// Cache that never reports an entry as current.
///
/// Useful for "always extract" semantics, for example when the destination
/// tree is known to be freshly created.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl Cache for NoopCache {
    fn is_up_to_date(&self, _key: &str, _candidate: &Cacheable) -> bool {
        false
    }

    fn put(&mut self, _key: &str, _value: Cacheable) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn absent_key_is_not_up_to_date() {
        let cache = MemoryCache::new();
        assert!(!cache.is_up_to_date("jquery/jquery.js", &Cacheable::new(10, 1)));
    }

    #[rstest]
    #[case::same(Cacheable::new(10, 1), true)]
    #[case::size_changed(Cacheable::new(11, 1), false)]
    #[case::stamp_changed(Cacheable::new(10, 2), false)]
    fn compares_recorded_fingerprint(#[case] candidate: Cacheable, #[case] expected: bool) {
        let mut cache = MemoryCache::new();
        cache.put("jquery/jquery.js", Cacheable::new(10, 1));
        assert_eq!(cache.is_up_to_date("jquery/jquery.js", &candidate), expected);
    }

    #[test]
    fn put_replaces_stale_fingerprint() {
        let mut cache = MemoryCache::new();
        cache.put("jquery/jquery.js", Cacheable::new(10, 1));
        cache.put("jquery/jquery.js", Cacheable::new(12, 2));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("jquery/jquery.js"), Some(&Cacheable::new(12, 2)));
    }

    #[test]
    fn keys_are_sorted() {
        let mut cache = MemoryCache::new();
        cache.put("jquery/jquery.min.js", Cacheable::new(5, 1));
        cache.put("bootstrap/js/bootstrap.js", Cacheable::new(3, 1));
        assert_eq!(
            cache.keys(),
            vec!["bootstrap/js/bootstrap.js", "jquery/jquery.min.js"]
        );
    }

    #[test]
    fn noop_cache_never_reports_current() {
        let mut cache = NoopCache;
        cache.put("jquery/jquery.js", Cacheable::new(10, 1));
        assert!(!cache.is_up_to_date("jquery/jquery.js", &Cacheable::new(10, 1)));
    }
}
