use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{City, CityLookup};
use crate::error::{CatalogError, CollaboratorError};
use crate::facility::IrradiationTier;

/// Mean Earth radius used for great-circle distances (km).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// In-memory city catalog answering nearest-city queries by great-circle distance.
///
/// When `max_distance_km` is set, cities farther than that are not returned,
/// which lets the classifier fall back to latitude bands for remote sites.
#[derive(Debug, Clone, Default)]
pub struct CityCatalog {
    cities: Vec<City>,
    max_distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CityRow {
    name: String,
    latitude: f64,
    longitude: f64,
    tier: String,
}

impl CityCatalog {
    pub fn new(cities: Vec<City>) -> Self {
        Self {
            cities,
            max_distance_km: None,
        }
    }

    /// Limits lookups to cities within `km` of the query point.
    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    /// Loads a catalog from CSV with header `name,latitude,longitude,tier`.
    ///
    /// Tier tags outside `A`..`D` resolve to `C`.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on malformed rows or out-of-range coordinates.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut cities = Vec::new();

        for (idx, record) in rdr.deserialize::<CityRow>().enumerate() {
            let row = record?;
            let line = idx + 2;
            if !(-90.0..=90.0).contains(&row.latitude) {
                return Err(CatalogError::InvalidRow {
                    row: line,
                    message: format!("latitude {} out of range", row.latitude),
                });
            }
            if !(-180.0..=180.0).contains(&row.longitude) {
                return Err(CatalogError::InvalidRow {
                    row: line,
                    message: format!("longitude {} out of range", row.longitude),
                });
            }
            cities.push(City {
                name: row.name,
                latitude: row.latitude,
                longitude: row.longitude,
                tier: IrradiationTier::from(row.tier),
            });
        }

        Ok(Self::new(cities))
    }

    /// Loads a catalog from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_csv_reader(file)
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl CityLookup for CityCatalog {
    fn nearest_city(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<City>, CollaboratorError> {
        let nearest = self
            .cities
            .iter()
            .map(|city| (city, haversine_km(latitude, longitude, city.latitude, city.longitude)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        Ok(nearest
            .filter(|(_, km)| self.max_distance_km.is_none_or(|max| *km <= max))
            .map(|(city, _)| city.clone()))
    }
}

/// Great-circle distance between two points in degrees (km).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "name,latitude,longitude,tier
Casablanca,33.57,-7.59,C
Ouarzazate,30.92,-6.89,A
Tanger,35.76,-5.83,D
";

    #[test]
    fn parses_csv_catalog() {
        let catalog = CityCatalog::from_csv_reader(SAMPLE.as_bytes()).expect("sample parses");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.cities()[1].tier, IrradiationTier::A);
    }

    #[test]
    fn unknown_tier_tag_resolves_to_c() {
        let csv = "name,latitude,longitude,tier\nSomewhere,31.0,-7.0,Z\n";
        let catalog = CityCatalog::from_csv_reader(csv.as_bytes()).expect("row parses");
        assert_eq!(catalog.cities()[0].tier, IrradiationTier::C);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let csv = "name,latitude,longitude,tier\nNowhere,95.0,-7.0,A\n";
        let err = CityCatalog::from_csv_reader(csv.as_bytes());
        assert!(matches!(err, Err(CatalogError::InvalidRow { row: 2, .. })));
    }

    #[test]
    fn finds_nearest_city() {
        let catalog = CityCatalog::from_csv_reader(SAMPLE.as_bytes()).expect("sample parses");
        let city = catalog.nearest_city(33.0, -7.0).ok().flatten();
        assert_eq!(city.map(|c| c.name), Some("Casablanca".to_string()));
    }

    #[test]
    fn max_distance_excludes_remote_points() {
        let catalog = CityCatalog::from_csv_reader(SAMPLE.as_bytes())
            .expect("sample parses")
            .with_max_distance_km(100.0);
        assert!(matches!(catalog.nearest_city(23.7, -15.9), Ok(None)));
    }

    #[test]
    fn empty_catalog_has_no_city() {
        assert!(matches!(CityCatalog::default().nearest_city(0.0, 0.0), Ok(None)));
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Casablanca to Rabat is roughly 87 km.
        let km = haversine_km(33.57, -7.59, 34.02, -6.84);
        assert!((km - 87.0).abs() < 5.0, "got {km}");
    }
}
