//! Adapter for the bubble network: filters the node set, resolves the
//! size metric (lazily enriching from Wikipedia when it is pageviews),
//! builds the similarity links and packages everything the force layout
//! needs.

use crate::dataset::{ArtistRecord, Dataset};
use crate::enrichment::EnrichmentSource;
use crate::network::{build_links, cluster_anchors, Anchor, RadiusScale, SimilarityEdge};
use crate::view::session::{find_by_name, SessionContext};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMetric {
    #[default]
    Paintings,
    WikiViews,
}

/// The network's controls. `Default` is the reset state.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParams {
    pub genre_filter: Option<String>,
    pub min_common: usize,
    pub size_metric: SizeMetric,
    pub search: String,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            genre_filter: None,
            min_common: 1,
            size_metric: SizeMetric::Paintings,
            search: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeModel {
    pub id: String,
    pub name: String,
    pub category: String,
    pub genres: Vec<String>,
    pub nationalities: Vec<String>,
    pub years: String,
    pub wikipedia: String,
    /// Value under the active size metric; unresolved pageviews read 0
    /// until their batch arrives.
    pub metric_value: f64,
    pub radius: f64,
    /// The multi-genre badge.
    pub multi: bool,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkModel {
    pub source: String,
    pub target: String,
    pub common: usize,
    pub stroke_width: f64,
    pub distance: f64,
    pub strength: f64,
}

impl From<&SimilarityEdge> for LinkModel {
    fn from(edge: &SimilarityEdge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            common: edge.common,
            stroke_width: edge.stroke_width(),
            distance: edge.distance(),
            strength: edge.strength(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkModel {
    pub nodes: Vec<NodeModel>,
    pub links: Vec<LinkModel>,
    /// Legend domain: every primary genre of the full dataset, so anchors
    /// and colors stay put when a filter narrows the node set.
    pub categories: Vec<String>,
    pub stats: String,
    /// First node matching the search box, to highlight and recenter.
    pub focused: Option<String>,
    /// True when this pass fetched an enrichment batch; the caller owes
    /// exactly one re-derivation to pick up the new values.
    pub loaded_more: bool,
}

/// Derive the network model. Mutates only the session's enrichment cache,
/// and only when the size metric needs pageviews.
pub fn derive(
    dataset: &Dataset,
    params: &NetworkParams,
    session: &mut SessionContext,
    source: &dyn EnrichmentSource,
    viewport: (f64, f64),
) -> NetworkModel {
    let categories = dataset.primary_genre_domain();
    let anchors = cluster_anchors(&categories, viewport.0, viewport.1);
    let center = Anchor {
        x: viewport.0 / 2.0,
        y: viewport.1 / 2.0,
    };

    let nodes: Vec<&ArtistRecord> = dataset
        .records
        .iter()
        .filter(|r| {
            params
                .genre_filter
                .as_deref()
                .map_or(true, |genre| r.primary_genre() == genre)
        })
        .collect();

    // Lazily resolve one batch of pageviews for the nodes in view. Keys
    // resolved for nodes no longer in view just sit in the cache.
    let loaded_more = if params.size_metric == SizeMetric::WikiViews {
        let titles = nodes.iter().filter_map(|r| r.wiki_title.as_deref());
        session.cache.ensure_views(titles, source)
    } else {
        false
    };

    let metric_value = |record: &ArtistRecord| -> f64 {
        match params.size_metric {
            SizeMetric::Paintings => record.paintings as f64,
            SizeMetric::WikiViews => record
                .wiki_title
                .as_deref()
                .and_then(|t| session.cache.cached_views(t))
                .flatten()
                .unwrap_or(0) as f64,
        }
    };

    let scale = RadiusScale::from_values(nodes.iter().map(|r| metric_value(r)));

    let node_models: Vec<NodeModel> = nodes
        .iter()
        .map(|record| {
            let value = metric_value(record);
            NodeModel {
                id: record.id.clone(),
                name: record.name.clone(),
                category: record.primary_genre().to_string(),
                genres: record.genres.clone(),
                nationalities: record.nationalities.clone(),
                years: record.years.clone(),
                wikipedia: record.wikipedia.clone(),
                metric_value: value,
                radius: scale.radius(value),
                multi: record.is_multi_genre(),
                anchor: anchors
                    .get(record.primary_genre())
                    .copied()
                    .unwrap_or(center),
            }
        })
        .collect();

    let graph = build_links(&nodes, params.min_common);
    let links: Vec<LinkModel> = graph.edges.iter().map(LinkModel::from).collect();

    // Search runs over the filtered node set, so the first in-view match
    // wins even when an earlier record elsewhere in the dataset matches.
    let focused =
        find_by_name(nodes.iter().copied(), &params.search).map(|found| found.id.clone());

    NetworkModel {
        stats: format!("{} artists — {} links", node_models.len(), links.len()),
        nodes: node_models,
        links,
        categories,
        focused,
        loaded_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::OfflineSource;

    fn sample() -> Dataset {
        Dataset {
            records: vec![
                ArtistRecord::from_fields(
                    "monet",
                    "Claude Monet",
                    "1840-1926",
                    "Impressionism",
                    "French",
                    "250",
                    "https://en.wikipedia.org/wiki/Claude_Monet",
                ),
                ArtistRecord::from_fields(
                    "morisot",
                    "Berthe Morisot",
                    "1841-1895",
                    "Impressionism,Realism",
                    "French",
                    "120",
                    "https://en.wikipedia.org/wiki/Berthe_Morisot",
                ),
                ArtistRecord::from_fields(
                    "picasso",
                    "Pablo Picasso",
                    "1881-1973",
                    "Cubism",
                    "Spanish",
                    "1000",
                    "https://en.wikipedia.org/wiki/Pablo_Picasso",
                ),
            ],
        }
    }

    #[test]
    fn test_derive_links_and_stats() {
        let dataset = sample();
        let mut session = SessionContext::default();
        let model = derive(
            &dataset,
            &NetworkParams::default(),
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert_eq!(model.nodes.len(), 3);
        assert_eq!(model.links.len(), 1); // monet-morisot share Impressionism
        assert_eq!(model.stats, "3 artists — 1 links");
        assert!(!model.loaded_more);
    }

    #[test]
    fn test_genre_filter_narrows_nodes_but_not_legend() {
        let dataset = sample();
        let mut session = SessionContext::default();
        let params = NetworkParams {
            genre_filter: Some("Cubism".to_string()),
            ..Default::default()
        };
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert_eq!(model.nodes.len(), 1);
        // Legend still carries the whole domain.
        assert_eq!(model.categories, vec!["Cubism", "Impressionism"]);
    }

    #[test]
    fn test_search_focus_must_be_in_view() {
        let dataset = sample();
        let mut session = SessionContext::default();
        let params = NetworkParams {
            search: "monet".to_string(),
            ..Default::default()
        };
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert_eq!(model.focused.as_deref(), Some("monet"));

        // Filtered out of view: no focus even though the name matches.
        let params = NetworkParams {
            genre_filter: Some("Cubism".to_string()),
            search: "monet".to_string(),
            ..Default::default()
        };
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert_eq!(model.focused, None);
    }

    #[test]
    fn test_search_first_match_comes_from_filtered_set() {
        let dataset = sample();
        let mut session = SessionContext::default();
        // Globally, "o" matches Monet first; with the Cubism filter only
        // Picasso is in view and must win.
        let params = NetworkParams {
            genre_filter: Some("Cubism".to_string()),
            search: "o".to_string(),
            ..Default::default()
        };
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert_eq!(model.focused.as_deref(), Some("picasso"));
    }

    #[test]
    fn test_wiki_views_metric_offline_reads_zero() {
        let dataset = sample();
        let mut session = SessionContext::default();
        let params = NetworkParams {
            size_metric: SizeMetric::WikiViews,
            ..Default::default()
        };
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        // First pass fetches a batch (all absent offline)...
        assert!(model.loaded_more);
        for node in &model.nodes {
            assert_eq!(node.metric_value, 0.0);
        }
        // ...and the follow-up pass finds nothing left to fetch.
        let model = derive(
            &dataset,
            &params,
            &mut session,
            &OfflineSource,
            (1000.0, 800.0),
        );
        assert!(!model.loaded_more);
    }
}
