use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel category for records whose genre list is empty.
pub const UNKNOWN_GENRE: &str = "Unknown";

lazy_static! {
    static ref YEAR_RANGE_RE: Regex = Regex::new(r"(\d{4}).*?(\d{4})").unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"(\d{4})").unwrap();
}

/// One artist from the source dataset.
///
/// Constructed once per CSV row and immutable afterwards; enrichment data
/// (thumbnail, pageviews) lives in the session cache, keyed by `wiki_title`,
/// never on the record itself.
///
/// Records without any parseable year are kept in the set; they take part
/// in every non-temporal view and are only skipped by the temporal binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    /// The raw free-text years field, e.g. "1840 - 1926".
    pub years: String,
    pub birth: Option<i32>,
    pub death: Option<i32>,
    /// Representative year: rounded midpoint of birth and death, or birth
    /// alone when the death year is unknown. Defined iff `birth` is.
    pub mid: Option<i32>,
    pub paintings: u32,
    /// Ordered; the first entry is the primary genre.
    pub genres: Vec<String>,
    pub nationalities: Vec<String>,
    pub wikipedia: String,
    /// Page title derived from the wikipedia URL, used as enrichment key.
    pub wiki_title: Option<String>,
}

impl ArtistRecord {
    /// Build a record from raw string fields. Never fails: malformed values
    /// degrade to the documented defaults.
    pub fn from_fields(
        id: &str,
        name: &str,
        years: &str,
        genre: &str,
        nationality: &str,
        paintings: &str,
        wikipedia: &str,
    ) -> Self {
        let (birth, death) = parse_years(years);
        let mid = match (birth, death) {
            (Some(b), Some(d)) => Some(((b + d) as f64 / 2.0).round() as i32),
            (Some(b), None) => Some(b),
            _ => None,
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
            years: years.to_string(),
            birth,
            death,
            mid,
            paintings: paintings.trim().parse().unwrap_or(0),
            genres: parse_list(genre),
            nationalities: parse_list(nationality),
            wikipedia: wikipedia.to_string(),
            wiki_title: wiki_title_from_url(wikipedia),
        }
    }

    /// First genre in the list, or the `"Unknown"` sentinel.
    pub fn primary_genre(&self) -> &str {
        self.genres.first().map(String::as_str).unwrap_or(UNKNOWN_GENRE)
    }

    /// Whether the record carries more than one genre (badge in the
    /// network view).
    pub fn is_multi_genre(&self) -> bool {
        self.genres.len() > 1
    }
}

/// Extract (birth, death) from a free-text years field.
///
/// The first two 4-digit numbers found are birth and death; a single one
/// is birth with death unknown; none leaves both unknown.
pub fn parse_years(raw: &str) -> (Option<i32>, Option<i32>) {
    if let Some(caps) = YEAR_RANGE_RE.captures(raw) {
        let birth = caps[1].parse().ok();
        let death = caps[2].parse().ok();
        return (birth, death);
    }
    if let Some(caps) = YEAR_RE.captures(raw) {
        return (caps[1].parse().ok(), None);
    }
    (None, None)
}

/// Split a comma-delimited field into trimmed, non-empty entries.
/// Idempotent: re-normalizing a joined normalized list is a no-op.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive the page title from a wikipedia URL (".../wiki/Claude_Monet"),
/// percent-decoded with underscores kept. Anything that does not look like
/// a wiki page URL yields `None` and the record is skipped by enrichment.
pub fn wiki_title_from_url(url: &str) -> Option<String> {
    let idx = url.find("/wiki/")?;
    let title = &url[idx + "/wiki/".len()..];
    let title = title.split(['?', '#']).next().unwrap_or(title);
    if title.is_empty() {
        return None;
    }
    match urlencoding::decode(title) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(title.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_years_full_range() {
        assert_eq!(parse_years("1840-1926"), (Some(1840), Some(1926)));
        assert_eq!(parse_years("c. 1606 – 1669"), (Some(1606), Some(1669)));
    }

    #[test]
    fn test_parse_years_birth_only() {
        assert_eq!(parse_years("born 1932"), (Some(1932), None));
    }

    #[test]
    fn test_parse_years_nothing() {
        assert_eq!(parse_years(""), (None, None));
        assert_eq!(parse_years("unknown"), (None, None));
    }

    #[test]
    fn test_parse_years_same_number_twice() {
        // Positionally distinct numbers count as a range even when equal.
        assert_eq!(parse_years("1900-1900"), (Some(1900), Some(1900)));
    }

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" Impressionism , Post-Impressionism ,,"),
            vec!["Impressionism", "Post-Impressionism"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_list_idempotent() {
        let once = parse_list("a, b ,c");
        let again = parse_list(&once.join(","));
        assert_eq!(once, again);
    }

    #[test]
    fn test_from_fields_monet() {
        let r = ArtistRecord::from_fields(
            "1",
            "Claude Monet",
            "1840-1926",
            "Impressionism",
            "French",
            "250",
            "https://en.wikipedia.org/wiki/Claude_Monet",
        );
        assert_eq!(r.birth, Some(1840));
        assert_eq!(r.death, Some(1926));
        assert_eq!(r.mid, Some(1883));
        assert_eq!(r.paintings, 250);
        assert_eq!(r.primary_genre(), "Impressionism");
        assert_eq!(r.wiki_title.as_deref(), Some("Claude_Monet"));
    }

    #[test]
    fn test_from_fields_degrades_bad_values() {
        let r = ArtistRecord::from_fields("2", "Anon", "", "", "", "lots", "not a url");
        assert_eq!(r.birth, None);
        assert_eq!(r.mid, None);
        assert_eq!(r.paintings, 0);
        assert_eq!(r.primary_genre(), UNKNOWN_GENRE);
        assert!(r.wiki_title.is_none());
    }

    #[test]
    fn test_mid_rounds_half_up() {
        let r = ArtistRecord::from_fields("3", "X", "1800-1801", "", "", "0", "");
        assert_eq!(r.mid, Some(1801));
    }

    #[test]
    fn test_wiki_title_from_url() {
        assert_eq!(
            wiki_title_from_url("https://en.wikipedia.org/wiki/%C3%89douard_Manet"),
            Some("Édouard_Manet".to_string())
        );
        assert_eq!(wiki_title_from_url("https://example.com/page"), None);
        assert_eq!(wiki_title_from_url(""), None);
    }

    #[test]
    fn test_multi_genre_flag() {
        let r = ArtistRecord::from_fields("4", "X", "", "Cubism,Surrealism", "", "1", "");
        assert!(r.is_multi_genre());
    }
}
