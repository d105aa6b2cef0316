//! Dataset loading from the artists CSV.

use super::record::ArtistRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Non-fatal issues encountered while loading. The load itself only fails
/// when the file cannot be read or contains no usable rows at all.
#[derive(Debug, Error)]
pub enum Problem {
    /// A row the CSV reader could not decode; the row is skipped.
    #[error("Row {0} could not be decoded: {1}")]
    MalformedRow(u64, String),

    /// A row whose years field yielded no 4-digit number; the record is
    /// kept but excluded from temporal views.
    #[error("Record {id} has no usable year in {years:?}")]
    NoUsableYear { id: String, years: String },
}

#[derive(Deserialize, Default)]
struct RawRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    years: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    nationality: String,
    #[serde(default)]
    paintings: String,
    #[serde(default)]
    wikipedia: String,
}

/// The loaded record set.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<ArtistRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique primary genres, used to populate category filters and
    /// the network legend.
    pub fn primary_genre_domain(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.primary_genre()).collect();
        set.into_iter().map(str::to_string).collect()
    }
}

fn read_records<R: std::io::Read>(reader: R) -> (Vec<ArtistRecord>, Vec<Problem>) {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut problems = Vec::new();

    for (idx, row) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                problems.push(Problem::MalformedRow(idx as u64 + 1, err.to_string()));
                continue;
            }
        };
        let record = ArtistRecord::from_fields(
            &row.id,
            &row.name,
            &row.years,
            &row.genre,
            &row.nationality,
            &row.paintings,
            &row.wikipedia,
        );
        if record.birth.is_none() && !row.years.is_empty() {
            problems.push(Problem::NoUsableYear {
                id: record.id.clone(),
                years: row.years,
            });
        }
        records.push(record);
    }

    (records, problems)
}

/// Load the artists CSV. A missing or unreadable file is fatal; individual
/// malformed rows and fields degrade per the record parser's rules and are
/// reported here as non-fatal problems.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open artists CSV at {}", path.display()))?;

    let (records, problems) = read_records(file);

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {}", problem);
        }
    }

    if records.is_empty() {
        anyhow::bail!("No usable rows in {}", path.display());
    }

    info!("Dataset has {} artists", records.len());
    Ok(Dataset { records })
}
