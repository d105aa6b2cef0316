//! Atelier Dataset Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod dataset;
pub mod enrichment;
pub mod geo;
pub mod network;
pub mod quali;
pub mod timeline;
pub mod view;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use dataset::{load_dataset, ArtistRecord, Dataset};
pub use enrichment::{EnrichmentCache, EnrichmentSource, OfflineSource, WikipediaClient};
pub use view::{find_by_name, SessionContext};
