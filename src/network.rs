//! Genre-overlap similarity graph between artists, plus the layout
//! parameters the force engine consumes (anchor circle, radius scale,
//! per-link distance and strength).

use crate::dataset::ArtistRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// An undirected link between two artists sharing at least the threshold
/// number of genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityEdge {
    pub source: String,
    pub target: String,
    /// Size of the genre-set intersection; always >= the build threshold.
    pub common: usize,
}

impl SimilarityEdge {
    /// Rendered stroke width for this link.
    pub fn stroke_width(&self) -> f64 {
        (0.6 + self.common as f64 * 0.6).min(3.0)
    }

    /// Force-layout rest distance: more shared genres pull closer.
    pub fn distance(&self) -> f64 {
        26.0 + 18.0 / self.common as f64
    }

    /// Force-layout link strength, capped.
    pub fn strength(&self) -> f64 {
        (0.10 + self.common as f64 * 0.07).min(0.35)
    }
}

/// O(1) "are these two linked" lookups over a built edge set. Reflexive:
/// every node counts as linked to itself (the hover highlight keeps the
/// hovered bubble lit).
#[derive(Debug, Default)]
pub struct Adjacency {
    pairs: HashSet<(String, String)>,
}

impl Adjacency {
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn is_linked(&self, a: &str, b: &str) -> bool {
        a == b || self.pairs.contains(&Self::key(a, b))
    }
}

/// Count of shared genres between two ordered genre lists.
pub fn common_genre_count(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let set: HashSet<&str> = a.iter().map(String::as_str).collect();
    b.iter().filter(|g| set.contains(g.as_str())).count()
}

/// The built graph: edges plus the adjacency index over them.
#[derive(Debug)]
pub struct SimilarityGraph {
    pub edges: Vec<SimilarityEdge>,
    pub adjacency: Adjacency,
}

/// Full pairwise comparison over the node set. Quadratic on purpose: the
/// node count is bounded by the dataset, and the edge set is recomputed
/// from scratch whenever the node set or threshold changes.
pub fn build_links(nodes: &[&ArtistRecord], min_common: usize) -> SimilarityGraph {
    let mut edges = Vec::new();
    let mut adjacency = Adjacency::default();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = nodes[i];
            let b = nodes[j];
            let common = common_genre_count(&a.genres, &b.genres);
            if common >= min_common {
                adjacency.pairs.insert(Adjacency::key(&a.id, &b.id));
                edges.push(SimilarityEdge {
                    source: a.id.clone(),
                    target: b.id.clone(),
                    common,
                });
            }
        }
    }

    SimilarityGraph { edges, adjacency }
}

/// A cluster anchor point for one category. Participates in the layout
/// only as an attractive force, never as a hard position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// One anchor per category, arranged evenly on a circle whose radius is
/// proportional to the viewport's smaller dimension.
pub fn cluster_anchors(categories: &[String], width: f64, height: f64) -> HashMap<String, Anchor> {
    let radius = width.min(height) * 0.26;
    let (cx, cy) = (width / 2.0, height / 2.0);

    // Angles spread like a point scale over [0, 2*pi]: n points at
    // 2*pi*i/(n-1), with a lone category sitting at angle 0.
    let n = categories.len();
    let step = if n > 1 {
        std::f64::consts::TAU / (n as f64 - 1.0)
    } else {
        0.0
    };

    categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let angle = step * i as f64;
            let anchor = Anchor {
                x: cx + angle.cos() * radius,
                y: cy + angle.sin() * radius,
            };
            (category.clone(), anchor)
        })
        .collect()
}

/// Square-root scale mapping a metric value into bubble radii, so area
/// tracks the value.
#[derive(Debug, Clone, Copy)]
pub struct RadiusScale {
    max_value: f64,
}

pub const MIN_RADIUS: f64 = 10.0;
pub const MAX_RADIUS: f64 = 62.0;

impl RadiusScale {
    /// Domain is [0, max of the current node values], with a floor of 1 so
    /// an all-zero set still renders.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let max_value = values.into_iter().fold(0.0_f64, f64::max).max(1.0);
        Self { max_value }
    }

    pub fn radius(&self, value: f64) -> f64 {
        let t = (value.max(0.0) / self.max_value).sqrt();
        MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)
    }
}
