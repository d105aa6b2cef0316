//! Temporal binning of artist records into fixed-width year buckets.

use crate::dataset::ArtistRecord;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Catch-all category for genres outside the retained top-N.
pub const OTHER_CATEGORY: &str = "Other";

/// Which derived year places a record on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBasis {
    Birth,
    Death,
    #[default]
    Mid,
}

impl DateBasis {
    /// The record's year under this basis, if defined. Records with no
    /// value here are excluded from binning but from nothing else.
    pub fn year_of(&self, record: &ArtistRecord) -> Option<i32> {
        match self {
            DateBasis::Birth => record.birth,
            DateBasis::Death => record.death,
            DateBasis::Mid => record.mid,
        }
    }
}

/// Readout selected for a computed bin set. Orthogonal to the binning
/// itself: switching metric never requires re-binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    TotalPaintings,
    ArtistCount,
    AvgPaintings,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::TotalPaintings => "Total works",
            Metric::ArtistCount => "Artist count",
            Metric::AvgPaintings => "Average works per artist",
        }
    }
}

/// Bucket key for a year: floor division, so the partition is exact for
/// any positive width, negative years included. A zero width is treated
/// as 1; configuration rejects it before it gets here.
pub fn bin_year(year: i32, width: u32) -> i32 {
    let width = width.max(1) as i32;
    year.div_euclid(width) * width
}

/// How many artists a bin detail panel lists at most.
const TOP_ARTISTS_PER_BIN: usize = 10;

/// One time bucket and its aggregates.
#[derive(Debug, Clone)]
pub struct TimeBin<'a> {
    /// Lower edge of the bucket; always a multiple of the bin width.
    pub key: i32,
    pub members: Vec<&'a ArtistRecord>,
    pub total_paintings: u64,
    pub artist_count: usize,
    pub avg_paintings: f64,
    /// Top members by painting count, ties kept in original order.
    pub top: Vec<&'a ArtistRecord>,
}

impl TimeBin<'_> {
    /// The bin's value under the given metric.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalPaintings => self.total_paintings as f64,
            Metric::ArtistCount => self.artist_count as f64,
            Metric::AvgPaintings => self.avg_paintings,
        }
    }
}

/// Result of a single-series binning pass.
#[derive(Debug, Clone)]
pub struct BinSeries<'a> {
    /// Sorted ascending by key; together the bins hold every usable
    /// record exactly once.
    pub bins: Vec<TimeBin<'a>>,
    /// Records that had a defined year under the basis.
    pub usable_count: usize,
}

/// Bucket the records with a defined year under `basis` into bins of
/// `width` years.
pub fn compute_bins<'a, I>(records: I, width: u32, basis: DateBasis) -> BinSeries<'a>
where
    I: IntoIterator<Item = &'a ArtistRecord>,
{
    let mut grouped: BTreeMap<i32, Vec<&ArtistRecord>> = BTreeMap::new();
    let mut usable_count = 0;

    for record in records {
        if let Some(year) = basis.year_of(record) {
            grouped.entry(bin_year(year, width)).or_default().push(record);
            usable_count += 1;
        }
    }

    let bins = grouped
        .into_iter()
        .map(|(key, members)| {
            let total_paintings: u64 = members.iter().map(|r| r.paintings as u64).sum();
            let artist_count = members.len();
            let avg_paintings = if artist_count > 0 {
                total_paintings as f64 / artist_count as f64
            } else {
                0.0
            };
            let mut top = members.clone();
            // Stable sort keeps original order among equal counts.
            top.sort_by(|a, b| b.paintings.cmp(&a.paintings));
            top.truncate(TOP_ARTISTS_PER_BIN);
            TimeBin {
                key,
                members,
                total_paintings,
                artist_count,
                avg_paintings,
                top,
            }
        })
        .collect();

    BinSeries { bins, usable_count }
}

/// Per-category aggregates inside one stacked bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub total_paintings: u64,
    pub artist_count: usize,
}

/// One time bucket of the multi-series variant.
#[derive(Debug, Clone)]
pub struct StackBin<'a> {
    pub key: i32,
    pub members: Vec<&'a ArtistRecord>,
    pub by_category: HashMap<String, CategoryAggregate>,
}

impl StackBin<'_> {
    /// Aggregate value for one stack key under the given metric. Averages
    /// are not stackable, so they read as totals here; the adapter never
    /// requests a stacked average in the first place.
    pub fn value(&self, category: &str, metric: Metric) -> u64 {
        let agg = match self.by_category.get(category) {
            Some(agg) => agg,
            None => return 0,
        };
        match metric {
            Metric::ArtistCount => agg.artist_count as u64,
            _ => agg.total_paintings,
        }
    }
}

/// Result of a multi-series binning pass.
#[derive(Debug, Clone)]
pub struct StackSeries<'a> {
    pub bins: Vec<StackBin<'a>>,
    /// Retained categories sorted ascending, with `"Other"` appended when
    /// any record fell outside them. Stable across every bin of the pass.
    pub keys: Vec<String>,
    pub usable_count: usize,
}

/// `top_n` values of 999 and above mean "keep every category".
pub const TOP_N_ALL: usize = 999;

/// Bucket records into bins of `width` years, split per primary genre.
///
/// Category retention is decided once over the whole usable set (top
/// `top_n` genres by total paintings); everything else folds into
/// `"Other"`, so the stack keys do not shift from bin to bin.
pub fn compute_stack<'a, I>(
    records: I,
    width: u32,
    basis: DateBasis,
    top_n: usize,
) -> StackSeries<'a>
where
    I: IntoIterator<Item = &'a ArtistRecord>,
{
    let usable: Vec<&ArtistRecord> = records
        .into_iter()
        .filter(|r| basis.year_of(r).is_some())
        .collect();
    let usable_count = usable.len();

    // Totals per genre in first-seen order, then stable sort by volume.
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in &usable {
        let genre = record.primary_genre();
        match index.get(genre) {
            Some(&i) => totals[i].1 += record.paintings as u64,
            None => {
                index.insert(genre.to_string(), totals.len());
                totals.push((genre.to_string(), record.paintings as u64));
            }
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let retain = if top_n >= TOP_N_ALL { totals.len() } else { top_n };
    let keep: Vec<String> = totals.iter().take(retain).map(|(g, _)| g.clone()).collect();
    let is_kept = |genre: &str| keep.iter().any(|k| k == genre);

    let mut grouped: BTreeMap<i32, Vec<&ArtistRecord>> = BTreeMap::new();
    for record in &usable {
        if let Some(year) = basis.year_of(record) {
            grouped.entry(bin_year(year, width)).or_default().push(record);
        }
    }

    let mut has_other = false;
    let bins: Vec<StackBin> = grouped
        .into_iter()
        .map(|(key, members)| {
            let mut by_category: HashMap<String, CategoryAggregate> = HashMap::new();
            for record in &members {
                let genre = record.primary_genre();
                let category = if is_kept(genre) {
                    genre.to_string()
                } else {
                    has_other = true;
                    OTHER_CATEGORY.to_string()
                };
                let agg = by_category.entry(category).or_default();
                agg.total_paintings += record.paintings as u64;
                agg.artist_count += 1;
            }
            StackBin {
                key,
                members,
                by_category,
            }
        })
        .collect();

    let mut keys = keep;
    keys.sort();
    if has_other {
        keys.push(OTHER_CATEGORY.to_string());
    }

    StackSeries {
        bins,
        keys,
        usable_count,
    }
}

/// An inclusive year window restricting which computed bins are shown.
/// Purely a display filter: clearing it restores the full domain without
/// re-binning anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomDomain {
    pub start: i32,
    pub end: i32,
}

impl ZoomDomain {
    /// Build a window from a brush selection. Selections narrower than one
    /// bin width are rejected; endpoints are normalized to ascending order.
    pub fn from_brush(a: i32, b: i32, width: u32) -> Option<Self> {
        if a.abs_diff(b) < width {
            return None;
        }
        Some(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    pub fn contains(&self, key: i32) -> bool {
        key >= self.start && key <= self.end
    }
}
