//! Enrichment of artists with Wikipedia data (thumbnail, 30-day
//! pageviews), memoized per page title for the whole session.

mod wikipedia;

pub use wikipedia::WikipediaClient;

use std::collections::HashMap;

/// How many unresolved keys a single `ensure_*` call may send out.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// The external lookup service, reduced to what the views need: an
/// optional value per page title. Implementations must absorb their own
/// failures: a lookup that errors is indistinguishable from a page that
/// has no data.
pub trait EnrichmentSource {
    fn thumbnail(&self, title: &str) -> Option<String>;
    fn pageviews_30d(&self, title: &str) -> Option<u64>;
}

/// Write-once-per-key memo of enrichment lookups.
///
/// A key that resolved to "absent" stays absent: failed lookups are never
/// retried within a session, and resolved values are never refreshed.
#[derive(Debug, Default)]
pub struct EnrichmentCache {
    thumbnails: HashMap<String, Option<String>>,
    views: HashMap<String, Option<u64>>,
    batch_size: usize,
}

impl EnrichmentCache {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Default::default()
        }
    }

    fn batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    /// Cached thumbnail state: `None` = never looked up, `Some(None)` =
    /// looked up and absent.
    pub fn cached_thumbnail(&self, title: &str) -> Option<Option<&str>> {
        self.thumbnails.get(title).map(|v| v.as_deref())
    }

    pub fn cached_views(&self, title: &str) -> Option<Option<u64>> {
        self.views.get(title).copied()
    }

    /// Memoized thumbnail lookup: at most one outbound call per title.
    pub fn thumbnail(&mut self, title: &str, source: &dyn EnrichmentSource) -> Option<String> {
        if let Some(cached) = self.thumbnails.get(title) {
            return cached.clone();
        }
        let fetched = source.thumbnail(title);
        self.thumbnails.insert(title.to_string(), fetched.clone());
        fetched
    }

    /// Memoized pageview lookup: at most one outbound call per title.
    pub fn views(&mut self, title: &str, source: &dyn EnrichmentSource) -> Option<u64> {
        if let Some(cached) = self.views.get(title) {
            return *cached;
        }
        let fetched = source.pageviews_30d(title);
        self.views.insert(title.to_string(), fetched);
        fetched
    }

    /// Resolve pageviews for up to one batch of still-unknown titles.
    /// Returns whether anything was fetched, so the caller knows a single
    /// re-derivation is due, and no more than that.
    pub fn ensure_views<'a, I>(&mut self, titles: I, source: &dyn EnrichmentSource) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pending: Vec<&str> = titles
            .into_iter()
            .filter(|t| !self.views.contains_key(*t))
            .take(self.batch_size())
            .collect();
        if pending.is_empty() {
            return false;
        }
        for title in pending {
            let fetched = source.pageviews_30d(title);
            self.views.insert(title.to_string(), fetched);
        }
        true
    }

    /// Resolve thumbnails for up to one batch of still-unknown titles.
    pub fn ensure_thumbnails<'a, I>(&mut self, titles: I, source: &dyn EnrichmentSource) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pending: Vec<&str> = titles
            .into_iter()
            .filter(|t| !self.thumbnails.contains_key(*t))
            .take(self.batch_size())
            .collect();
        if pending.is_empty() {
            return false;
        }
        for title in pending {
            let fetched = source.thumbnail(title);
            self.thumbnails.insert(title.to_string(), fetched);
        }
        true
    }
}

/// Source that never resolves anything; used when running offline.
pub struct OfflineSource;

impl EnrichmentSource for OfflineSource {
    fn thumbnail(&self, _title: &str) -> Option<String> {
        None
    }

    fn pageviews_30d(&self, _title: &str) -> Option<u64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Counts outbound lookups and answers from a fixed table.
    struct CountingSource {
        views: HashMap<String, u64>,
        calls: RefCell<usize>,
    }

    impl CountingSource {
        fn new(views: &[(&str, u64)]) -> Self {
            Self {
                views: views
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl EnrichmentSource for CountingSource {
        fn thumbnail(&self, title: &str) -> Option<String> {
            *self.calls.borrow_mut() += 1;
            self.views
                .contains_key(title)
                .then(|| format!("https://img/{}.jpg", title))
        }

        fn pageviews_30d(&self, title: &str) -> Option<u64> {
            *self.calls.borrow_mut() += 1;
            self.views.get(title).copied()
        }
    }

    #[test]
    fn test_one_lookup_per_key() {
        let source = CountingSource::new(&[("Claude_Monet", 120_000)]);
        let mut cache = EnrichmentCache::default();

        assert_eq!(cache.views("Claude_Monet", &source), Some(120_000));
        assert_eq!(cache.views("Claude_Monet", &source), Some(120_000));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_absence_is_cached_and_not_retried() {
        let source = CountingSource::new(&[]);
        let mut cache = EnrichmentCache::default();

        assert_eq!(cache.thumbnail("Nobody", &source), None);
        assert_eq!(cache.thumbnail("Nobody", &source), None);
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.cached_thumbnail("Nobody"), Some(None));
    }

    #[test]
    fn test_ensure_views_is_batch_capped() {
        let titles: Vec<String> = (0..25).map(|i| format!("t{}", i)).collect();
        let table: Vec<(&str, u64)> = titles.iter().map(|t| (t.as_str(), 1)).collect();
        let source = CountingSource::new(&table);
        let mut cache = EnrichmentCache::new(10);

        assert!(cache.ensure_views(titles.iter().map(String::as_str), &source));
        assert_eq!(source.calls(), 10);
        assert!(cache.ensure_views(titles.iter().map(String::as_str), &source));
        assert!(cache.ensure_views(titles.iter().map(String::as_str), &source));
        assert_eq!(source.calls(), 25);
        // Everything resolved: no further fetches, no further rebuild.
        assert!(!cache.ensure_views(titles.iter().map(String::as_str), &source));
        assert_eq!(source.calls(), 25);
    }

    #[test]
    fn test_never_looked_up_vs_absent() {
        let source = CountingSource::new(&[]);
        let mut cache = EnrichmentCache::default();
        assert_eq!(cache.cached_views("X"), None);
        cache.views("X", &source);
        assert_eq!(cache.cached_views("X"), Some(None));
    }

    #[test]
    fn test_offline_source_resolves_nothing() {
        let mut cache = EnrichmentCache::default();
        assert_eq!(cache.thumbnail("Claude_Monet", &OfflineSource), None);
        assert_eq!(cache.views("Claude_Monet", &OfflineSource), None);
    }
}
