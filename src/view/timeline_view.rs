//! Adapter for the time-series chart: turns the record set plus the
//! current controls into a drawable series description.

use crate::dataset::ArtistRecord;
use crate::timeline::{
    compute_bins, compute_stack, DateBasis, Metric, StackBin, TimeBin, ZoomDomain,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Line,
    Stack,
}

/// The chart's controls. `Default` is the reset state.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineParams {
    pub basis: DateBasis,
    pub view: ViewKind,
    pub metric: Metric,
    pub bin_width: u32,
    pub top_n: usize,
    /// Restricts the input set before binning; only honored by the
    /// single-series view. The multi-series view exists to compare
    /// categories, so it always takes everything.
    pub genre_filter: Option<String>,
    pub zoom: Option<ZoomDomain>,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            basis: DateBasis::Mid,
            view: ViewKind::Line,
            metric: Metric::TotalPaintings,
            bin_width: 10,
            top_n: 8,
            genre_filter: None,
            zoom: None,
        }
    }
}

/// A short reference to an artist for the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub paintings: u32,
    pub primary_genre: String,
    pub wikipedia: String,
}

impl From<&ArtistRecord> for ArtistRef {
    fn from(record: &ArtistRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            paintings: record.paintings,
            primary_genre: record.primary_genre().to_string(),
            wikipedia: record.wikipedia.clone(),
        }
    }
}

/// One point of the single-series chart.
#[derive(Debug, Clone, Serialize)]
pub struct LinePoint {
    pub bin: i32,
    /// Inclusive upper year of the bucket, for the "1880 – 1889" label.
    pub bin_end: i32,
    pub value: f64,
    pub top: Vec<ArtistRef>,
}

/// One bucket row of the stacked chart: values aligned with the model's
/// `keys`.
#[derive(Debug, Clone, Serialize)]
pub struct StackRow {
    pub bin: i32,
    pub bin_end: i32,
    pub values: Vec<u64>,
    pub total: u64,
    pub top: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineSeries {
    Line { points: Vec<LinePoint> },
    Stack { keys: Vec<String>, rows: Vec<StackRow> },
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineModel {
    /// The view actually derived; a stacked request with the average
    /// metric downgrades to single-series, since per-category averages
    /// do not stack.
    pub effective_view: ViewKind,
    pub metric: Metric,
    pub metric_label: &'static str,
    pub stats: String,
    /// Set when no bin survives the filters; an empty state, not an error.
    pub empty_message: Option<String>,
    pub series: TimelineSeries,
}

/// How many artists a stacked bin's detail panel lists.
const STACK_PANEL_ARTISTS: usize = 12;

fn basis_name(basis: DateBasis) -> &'static str {
    match basis {
        DateBasis::Birth => "birth",
        DateBasis::Death => "death",
        DateBasis::Mid => "mid",
    }
}

fn stats_line(usable: usize, params: &TimelineParams) -> String {
    let zoom = if params.zoom.is_some() {
        " — zoom active"
    } else {
        ""
    };
    format!(
        "{} artists — bin: {} years — basis: {}{}",
        usable,
        params.bin_width,
        basis_name(params.basis),
        zoom
    )
}

fn shown<B>(bins: &[B], zoom: Option<ZoomDomain>, key: impl Fn(&B) -> i32) -> Vec<&B> {
    bins.iter()
        .filter(|b| zoom.map_or(true, |z| z.contains(key(b))))
        .collect()
}

fn line_point(bin: &TimeBin, metric: Metric, width: u32) -> LinePoint {
    LinePoint {
        bin: bin.key,
        bin_end: bin.key + width as i32 - 1,
        value: bin.value(metric),
        top: bin.top.iter().map(|r| ArtistRef::from(*r)).collect(),
    }
}

fn stack_row(bin: &StackBin, keys: &[String], metric: Metric, width: u32) -> StackRow {
    let values: Vec<u64> = keys.iter().map(|k| bin.value(k, metric)).collect();
    let total = values.iter().sum();
    let mut panel: Vec<&ArtistRecord> = bin.members.clone();
    panel.sort_by(|a, b| b.paintings.cmp(&a.paintings));
    panel.truncate(STACK_PANEL_ARTISTS);
    StackRow {
        bin: bin.key,
        bin_end: bin.key + width as i32 - 1,
        values,
        total,
        top: panel.into_iter().map(ArtistRef::from).collect(),
    }
}

/// Derive the chart model for the current parameters. Pure: no fetching,
/// no caching, safe to re-run on every control change.
pub fn derive(records: &[ArtistRecord], params: &TimelineParams) -> TimelineModel {
    // Averages cannot be stacked; declared fallback, not an error.
    let effective_view = if params.view == ViewKind::Stack && params.metric == Metric::AvgPaintings
    {
        ViewKind::Line
    } else {
        params.view
    };

    let (series, usable) = match effective_view {
        ViewKind::Line => {
            let filtered: Vec<&ArtistRecord> = records
                .iter()
                .filter(|r| {
                    params
                        .genre_filter
                        .as_deref()
                        .map_or(true, |genre| r.primary_genre() == genre)
                })
                .collect();
            let computed = compute_bins(filtered.into_iter(), params.bin_width, params.basis);
            let points = shown(&computed.bins, params.zoom, |b| b.key)
                .into_iter()
                .map(|b| line_point(b, params.metric, params.bin_width))
                .collect();
            (TimelineSeries::Line { points }, computed.usable_count)
        }
        ViewKind::Stack => {
            let computed = compute_stack(records.iter(), params.bin_width, params.basis, params.top_n);
            let rows = shown(&computed.bins, params.zoom, |b| b.key)
                .into_iter()
                .map(|b| stack_row(b, &computed.keys, params.metric, params.bin_width))
                .collect();
            (
                TimelineSeries::Stack {
                    keys: computed.keys,
                    rows,
                },
                computed.usable_count,
            )
        }
    };

    let is_empty = match &series {
        TimelineSeries::Line { points } => points.is_empty(),
        TimelineSeries::Stack { rows, .. } => rows.is_empty(),
    };

    TimelineModel {
        effective_view,
        metric: params.metric,
        metric_label: params.metric.label(),
        stats: stats_line(usable, params),
        empty_message: is_empty.then(|| "No data for these filters.".to_string()),
        series,
    }
}
