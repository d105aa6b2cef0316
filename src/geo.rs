//! Geographic placement of artists by nationality, for the map view.

use crate::dataset::ArtistRecord;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// A representative coordinate (capital or country center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

lazy_static! {
    /// Nationalities the dataset uses, mapped to a representative point.
    /// Entries without a geographic meaning are deliberately absent.
    static ref NATIONALITY_COORDS: HashMap<&'static str, Coordinates> = {
        let mut m = HashMap::new();
        let mut add = |name, lat, lon| {
            m.insert(name, Coordinates { lat, lon });
        };
        add("Italian", 41.9028, 12.4964); // Rome
        add("French", 48.8566, 2.3522); // Paris
        add("Belgian", 50.8503, 4.3517); // Brussels
        add("Flemish", 50.8503, 4.3517); // (Belgium)
        add("Dutch", 52.3676, 4.9041); // Amsterdam
        add("Spanish", 40.4168, -3.7038); // Madrid
        add("Russian", 55.7558, 37.6173); // Moscow
        add("Mexican", 19.4326, -99.1332); // Mexico City
        add("German", 52.5200, 13.4050); // Berlin
        add("Austrian", 48.2082, 16.3738); // Vienna
        add("Swiss", 46.9480, 7.4474); // Bern
        add("British", 51.5072, -0.1276); // London
        add("Norwegian", 59.9139, 10.7522); // Oslo
        add("American", 38.9072, -77.0369); // Washington DC
        add("Greek", 37.9838, 23.7275); // Athens
        add("Belarusian", 53.9006, 27.5590); // Minsk
        m
    };
}

/// First nationality with a known coordinate wins; records with none are
/// skipped by the map view.
pub fn pick_coords(nationalities: &[String]) -> Option<Coordinates> {
    nationalities
        .iter()
        .find_map(|n| NATIONALITY_COORDS.get(n.as_str()).copied())
}

/// One map marker: a locatable artist plus its popup fields.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub genres: Vec<String>,
    pub nationalities: Vec<String>,
    pub years: String,
    pub wikipedia: String,
    /// Filled from the enrichment cache when a thumbnail resolved.
    pub thumbnail: Option<String>,
}

/// Bounding box over a marker set, for the initial viewport fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub fn marker_for(record: &ArtistRecord) -> Option<Marker> {
    let coordinates = pick_coords(&record.nationalities)?;
    Some(Marker {
        id: record.id.clone(),
        name: record.name.clone(),
        coordinates,
        genres: record.genres.clone(),
        nationalities: record.nationalities.clone(),
        years: record.years.clone(),
        wikipedia: record.wikipedia.clone(),
        thumbnail: None,
    })
}

pub fn bounds_of(markers: &[Marker]) -> Option<Bounds> {
    let first = markers.first()?.coordinates;
    let mut bounds = Bounds {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lon: first.lon,
        max_lon: first.lon,
    };
    for marker in markers {
        let c = marker.coordinates;
        bounds.min_lat = bounds.min_lat.min(c.lat);
        bounds.max_lat = bounds.max_lat.max(c.lat);
        bounds.min_lon = bounds.min_lon.min(c.lon);
        bounds.max_lon = bounds.max_lon.max(c.lon);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_coords_first_known_wins() {
        let nationalities = vec!["Martian".to_string(), "French".to_string()];
        let coords = pick_coords(&nationalities).unwrap();
        assert!((coords.lat - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn test_pick_coords_none_known() {
        assert!(pick_coords(&["Martian".to_string()]).is_none());
        assert!(pick_coords(&[]).is_none());
    }

    #[test]
    fn test_marker_for_skips_unlocatable() {
        let located =
            ArtistRecord::from_fields("1", "Monet", "1840-1926", "Impressionism", "French", "1", "");
        let lost = ArtistRecord::from_fields("2", "X", "", "", "", "1", "");
        assert!(marker_for(&located).is_some());
        assert!(marker_for(&lost).is_none());
    }

    #[test]
    fn test_bounds_of_markers() {
        let records = vec![
            ArtistRecord::from_fields("1", "A", "", "", "French", "1", ""),
            ArtistRecord::from_fields("2", "B", "", "", "Russian", "1", ""),
        ];
        let markers: Vec<Marker> = records.iter().filter_map(marker_for).collect();
        let bounds = bounds_of(&markers).unwrap();
        assert!(bounds.min_lon < 3.0 && bounds.max_lon > 37.0);
        assert!(bounds_of(&[]).is_none());
    }
}
