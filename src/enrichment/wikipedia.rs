//! Wikipedia/Wikimedia REST clients for page thumbnails and pageviews.
//!
//! Lightly rate limited; lookups that fail for any reason (network, HTTP
//! status, decode) degrade to absence and are cached as such upstream.

use super::EnrichmentSource;
use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

const SUMMARY_API_BASE: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const PAGEVIEWS_API_BASE: &str =
    "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia.org/all-access/user";
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(100);

pub struct WikipediaClient {
    client: Client,
    last_request: Mutex<Instant>,
}

#[derive(Deserialize)]
struct SummaryResponse {
    thumbnail: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    source: Option<String>,
}

#[derive(Deserialize)]
struct PageviewsResponse {
    #[serde(default)]
    items: Vec<PageviewItem>,
}

#[derive(Deserialize)]
struct PageviewItem {
    #[serde(default)]
    views: u64,
}

impl WikipediaClient {
    pub fn new(user_agent: &str, timeout_sec: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            last_request: Mutex::new(Instant::now() - RATE_LIMIT_INTERVAL),
        })
    }

    fn rate_limit(&self) {
        let mut last = self.last_request.lock().unwrap();
        let elapsed = last.elapsed();
        if elapsed < RATE_LIMIT_INTERVAL {
            std::thread::sleep(RATE_LIMIT_INTERVAL - elapsed);
        }
        *last = Instant::now();
    }

    /// Thumbnail URL from the page summary endpoint, if the page exists
    /// and carries one.
    fn fetch_thumbnail(&self, title: &str) -> Result<Option<String>> {
        self.rate_limit();

        let url = format!("{}/{}", SUMMARY_API_BASE, urlencoding::encode(title));
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: SummaryResponse = response.json()?;
        Ok(body.thumbnail.and_then(|t| t.source))
    }

    /// Summed daily pageviews over the trailing 30 days (UTC).
    fn fetch_pageviews_30d(&self, title: &str) -> Result<Option<u64>> {
        self.rate_limit();

        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(30);
        let url = format!(
            "{}/{}/daily/{}/{}",
            PAGEVIEWS_API_BASE,
            urlencoding::encode(title),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        );

        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: PageviewsResponse = response.json()?;
        Ok(Some(body.items.iter().map(|item| item.views).sum()))
    }
}

impl EnrichmentSource for WikipediaClient {
    fn thumbnail(&self, title: &str) -> Option<String> {
        match self.fetch_thumbnail(title) {
            Ok(thumb) => thumb,
            Err(err) => {
                debug!("Thumbnail lookup failed for {}: {}", title, err);
                None
            }
        }
    }

    fn pageviews_30d(&self, title: &str) -> Option<u64> {
        match self.fetch_pageviews_30d(title) {
            Ok(views) => views,
            Err(err) => {
                debug!("Pageviews lookup failed for {}: {}", title, err);
                None
            }
        }
    }
}
