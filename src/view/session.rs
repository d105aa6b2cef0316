//! Session-scoped shared state: the enrichment cache and the overlay
//! selection. One context per visualization session, passed to the
//! adapters, never a process-wide singleton, so several views can run
//! side by side without stepping on each other.

use crate::dataset::ArtistRecord;
use crate::enrichment::{EnrichmentCache, DEFAULT_BATCH_SIZE};

#[derive(Debug)]
pub struct SessionContext {
    pub cache: EnrichmentCache,
    hovered: Option<String>,
    pinned: Option<String>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl SessionContext {
    pub fn new(batch_size: usize) -> Self {
        Self {
            cache: EnrichmentCache::new(batch_size),
            hovered: None,
            pinned: None,
        }
    }

    /// Transient hover preview. Suppressed while a pinned detail is open.
    pub fn hover(&mut self, id: &str) {
        if self.pinned.is_none() {
            self.hovered = Some(id.to_string());
        }
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// Pin a detail panel open; it stays until dismissed. Clicking the
    /// pinned item again unpins it.
    pub fn pin(&mut self, id: &str) {
        if self.pinned.as_deref() == Some(id) {
            self.pinned = None;
        } else {
            self.pinned = Some(id.to_string());
            self.hovered = None;
        }
    }

    /// Escape: close both overlays.
    pub fn dismiss_overlays(&mut self) {
        self.hovered = None;
        self.pinned = None;
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// The hover preview target, unless a pinned panel suppresses it.
    pub fn hovered(&self) -> Option<&str> {
        if self.pinned.is_some() {
            None
        } else {
            self.hovered.as_deref()
        }
    }
}

/// Case-insensitive substring search over names; the first match in the
/// given set wins, so callers pass the records currently in view.
pub fn find_by_name<'a, I>(records: I, query: &str) -> Option<&'a ArtistRecord>
where
    I: IntoIterator<Item = &'a ArtistRecord>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    records
        .into_iter()
        .find(|r| r.name.to_lowercase().contains(&query))
}
