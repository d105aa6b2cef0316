mod file_config;

pub use file_config::{EnrichmentConfig, FileConfig};

use crate::timeline::{DateBasis, Metric};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub csv_path: Option<PathBuf>,
    pub bin_width: u32,
    pub date_basis: DateBasis,
    pub metric: Metric,
    pub top_n: usize,
    pub min_common: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            bin_width: 10,
            date_basis: DateBasis::default(),
            metric: Metric::default(),
            top_n: 8,
            min_common: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub csv_path: PathBuf,
    pub bin_width: u32,
    pub date_basis: DateBasis,
    pub metric: Metric,
    pub top_n: usize,
    pub min_common: usize,

    // Feature configs (with defaults)
    pub enrichment: EnrichmentSettings,
}

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub batch_size: usize,
    pub timeout_sec: u64,
    pub user_agent: String,
    pub offline: bool,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            batch_size: crate::enrichment::DEFAULT_BATCH_SIZE,
            timeout_sec: 10,
            user_agent: default_user_agent(),
            offline: false,
        }
    }
}

fn default_user_agent() -> String {
    format!("atelier/{}", env!("CARGO_PKG_VERSION"))
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let csv_path = file
            .csv_path
            .map(PathBuf::from)
            .or_else(|| cli.csv_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("csv_path must be specified via --csv or in config file")
            })?;

        // Validate csv_path points at an existing file
        if !csv_path.exists() {
            bail!("Dataset file does not exist: {:?}", csv_path);
        }
        if !csv_path.is_file() {
            bail!("csv_path is not a file: {:?}", csv_path);
        }

        let bin_width = file.bin_width.unwrap_or(cli.bin_width);
        if bin_width == 0 {
            bail!("bin_width must be greater than zero");
        }

        let date_basis = match file.date_basis {
            Some(s) => match parse_date_basis(&s) {
                Some(b) => b,
                None => bail!("Invalid date_basis in config file: {:?}", s),
            },
            None => cli.date_basis,
        };

        let metric = match file.metric {
            Some(s) => match parse_metric(&s) {
                Some(m) => m,
                None => bail!("Invalid metric in config file: {:?}", s),
            },
            None => cli.metric,
        };

        let top_n = file.top_n.unwrap_or(cli.top_n);
        let min_common = file.min_common.unwrap_or(cli.min_common);

        // Enrichment settings - merge file config with defaults
        let en_file = file.enrichment.unwrap_or_default();
        let defaults = EnrichmentSettings::default();
        let enrichment = EnrichmentSettings {
            batch_size: en_file.batch_size.unwrap_or(defaults.batch_size),
            timeout_sec: en_file.timeout_sec.unwrap_or(defaults.timeout_sec),
            user_agent: en_file.user_agent.unwrap_or(defaults.user_agent),
            offline: en_file.offline.unwrap_or(defaults.offline),
        };
        if enrichment.batch_size == 0 {
            bail!("enrichment.batch_size must be greater than zero");
        }

        Ok(Self {
            csv_path,
            bin_width,
            date_basis,
            metric,
            top_n,
            min_common,
            enrichment,
        })
    }
}

/// Parses a date basis string into DateBasis.
/// Uses clap's ValueEnum trait for parsing.
fn parse_date_basis(s: &str) -> Option<DateBasis> {
    DateBasis::from_str(s, true).ok()
}

fn parse_metric(s: &str) -> Option<Metric> {
    Metric::from_str(s, true).ok()
}
