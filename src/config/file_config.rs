use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub csv_path: Option<String>,
    pub bin_width: Option<u32>,
    pub date_basis: Option<String>,
    pub metric: Option<String>,
    pub top_n: Option<usize>,
    pub min_common: Option<usize>,

    // Feature configs
    pub enrichment: Option<EnrichmentConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub batch_size: Option<usize>,
    pub timeout_sec: Option<u64>,
    pub user_agent: Option<String>,
    pub offline: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
