use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atelier::config::{AppConfig, CliConfig, FileConfig};
use atelier::dataset::load_dataset;
use atelier::enrichment::{EnrichmentSource, OfflineSource, WikipediaClient};
use atelier::timeline::{DateBasis, Metric, ZoomDomain};
use atelier::view::network_view::{self, NetworkParams, SizeMetric};
use atelier::view::timeline_view::{self, TimelineParams, ViewKind};
use atelier::view::{map_view, words_view, SessionContext};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser, Debug)]
#[clap(version = VERSION, about = "Derives view models from an artists dataset")]
struct CliArgs {
    /// Path to the artists CSV dataset.
    #[clap(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Path to a TOML config file. Values in it override CLI arguments.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip all outbound enrichment lookups.
    #[clap(long, global = true)]
    pub offline: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emit the time-series chart model.
    Timeline {
        /// Which year of an artist's life places them on the axis.
        #[clap(long, default_value = "mid")]
        basis: DateBasis,

        /// Single aggregate line, or one band per genre.
        #[clap(long, default_value = "line")]
        view: ViewKind,

        /// The aggregated quantity.
        #[clap(long, default_value = "total-paintings")]
        metric: Metric,

        /// Width of each year bin.
        #[clap(long, default_value_t = 10)]
        bin_width: u32,

        /// How many genres keep their own band; the rest fold into "Other".
        #[clap(long, default_value_t = 8)]
        top_n: usize,

        /// Restrict the single-series view to one primary genre.
        #[clap(long)]
        genre: Option<String>,

        /// Zoom domain start year (requires --zoom-to).
        #[clap(long)]
        zoom_from: Option<i32>,

        /// Zoom domain end year (requires --zoom-from).
        #[clap(long)]
        zoom_to: Option<i32>,
    },

    /// Emit the similarity network model.
    Network {
        /// Restrict nodes to one primary genre.
        #[clap(long)]
        genre: Option<String>,

        /// Minimum shared genres for a link.
        #[clap(long, default_value_t = 1)]
        min_common: usize,

        /// What drives node size.
        #[clap(long, default_value = "paintings")]
        size_metric: SizeMetric,

        /// Highlight the first node whose name contains this text.
        #[clap(long, default_value = "")]
        search: String,

        /// Viewport width in pixels, for the cluster layout.
        #[clap(long, default_value_t = 960.0)]
        width: f64,

        /// Viewport height in pixels, for the cluster layout.
        #[clap(long, default_value_t = 600.0)]
        height: f64,
    },

    /// Emit the word frequency model for a text (argument or stdin).
    Words {
        /// The text to analyze; read from stdin when omitted.
        text: Option<String>,
    },

    /// Emit the map model, one marker per locatable artist.
    Map,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .ok();

    // The words command works on a submitted text, not the dataset.
    if let Command::Words { text } = &cli_args.command {
        let text = match text {
            Some(text) => text.clone(),
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        let model = words_view::derive(&text);
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let mut cli_config = CliConfig {
        csv_path: cli_args.csv.clone(),
        ..Default::default()
    };
    match &cli_args.command {
        Command::Timeline {
            basis,
            metric,
            bin_width,
            top_n,
            ..
        } => {
            cli_config.date_basis = *basis;
            cli_config.metric = *metric;
            cli_config.bin_width = *bin_width;
            cli_config.top_n = *top_n;
        }
        Command::Network { min_common, .. } => {
            cli_config.min_common = *min_common;
        }
        _ => {}
    }

    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Loading dataset from {:?}...", config.csv_path);
    let dataset = load_dataset(&config.csv_path)?;
    info!("Loaded {} records", dataset.len());

    let offline = cli_args.offline || config.enrichment.offline;
    let source: Box<dyn EnrichmentSource> = if offline {
        Box::new(OfflineSource)
    } else {
        Box::new(WikipediaClient::new(
            &config.enrichment.user_agent,
            config.enrichment.timeout_sec,
        )?)
    };
    let mut session = SessionContext::new(config.enrichment.batch_size);

    match cli_args.command {
        Command::Timeline {
            view,
            genre,
            zoom_from,
            zoom_to,
            ..
        } => {
            let zoom = match (zoom_from, zoom_to) {
                (Some(from), Some(to)) => {
                    let zoom = ZoomDomain::from_brush(from, to, config.bin_width);
                    if zoom.is_none() {
                        warn!(
                            "Zoom span {}..{} is narrower than one {}-year bin, ignoring it",
                            from, to, config.bin_width
                        );
                    }
                    zoom
                }
                (None, None) => None,
                _ => bail!("--zoom-from and --zoom-to must be provided together"),
            };

            let params = TimelineParams {
                basis: config.date_basis,
                view,
                metric: config.metric,
                bin_width: config.bin_width,
                top_n: config.top_n,
                genre_filter: genre,
                zoom,
            };
            let model = timeline_view::derive(&dataset.records, &params);
            println!("{}", serde_json::to_string_pretty(&model)?);
        }

        Command::Network {
            genre,
            size_metric,
            search,
            width,
            height,
            ..
        } => {
            let params = NetworkParams {
                genre_filter: genre,
                min_common: config.min_common,
                size_metric,
                search,
            };
            // Each pass resolves at most one enrichment batch; keep going
            // until nothing new came in.
            let model = loop {
                let model = network_view::derive(
                    &dataset,
                    &params,
                    &mut session,
                    source.as_ref(),
                    (width, height),
                );
                if !model.loaded_more {
                    break model;
                }
            };
            println!("{}", serde_json::to_string_pretty(&model)?);
        }

        Command::Map => {
            let model = loop {
                let model = map_view::derive(&dataset, &mut session, source.as_ref());
                if !model.loaded_more {
                    break model;
                }
            };
            println!("{}", serde_json::to_string_pretty(&model)?);
        }

        Command::Words { .. } => unreachable!("handled before dataset load"),
    }

    Ok(())
}
