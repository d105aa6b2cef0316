//! Adapter for the map: one marker per locatable artist, with thumbnails
//! resolved lazily through the session cache, one capped batch per pass.

use crate::dataset::Dataset;
use crate::enrichment::EnrichmentSource;
use crate::geo::{bounds_of, marker_for, Bounds, Marker};
use crate::view::session::SessionContext;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MapModel {
    pub markers: Vec<Marker>,
    /// Viewport fit over all markers; absent when nothing is locatable.
    pub bounds: Option<Bounds>,
    /// Records without a locatable nationality, left off the map.
    pub skipped: usize,
    /// True when this pass fetched a thumbnail batch; the caller owes
    /// exactly one re-derivation to pick up the new values.
    pub loaded_more: bool,
}

/// Derive the map model. Mutates only the session's enrichment cache, and
/// resolves at most one batch of thumbnails per pass; markers whose batch
/// has not come in yet simply carry no thumbnail.
pub fn derive(
    dataset: &Dataset,
    session: &mut SessionContext,
    source: &dyn EnrichmentSource,
) -> MapModel {
    let mut placed = Vec::new();
    let mut skipped = 0;

    for record in &dataset.records {
        match marker_for(record) {
            Some(marker) => placed.push((marker, record.wiki_title.as_deref())),
            None => skipped += 1,
        }
    }

    let loaded_more = session
        .cache
        .ensure_thumbnails(placed.iter().filter_map(|(_, title)| *title), source);

    let markers: Vec<Marker> = placed
        .into_iter()
        .map(|(mut marker, title)| {
            marker.thumbnail = title
                .and_then(|t| session.cache.cached_thumbnail(t))
                .flatten()
                .map(str::to_string);
            marker
        })
        .collect();

    MapModel {
        bounds: bounds_of(&markers),
        markers,
        skipped,
        loaded_more,
    }
}
