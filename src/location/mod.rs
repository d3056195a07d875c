/// Reference city catalog loaded from CSV.
pub mod catalog;
pub mod classifier;

use serde::Serialize;

use crate::error::CollaboratorError;
use crate::facility::IrradiationTier;

pub use catalog::CityCatalog;
pub use classifier::{Classification, LocationClassifier};

/// A reference city with a known solar resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub tier: IrradiationTier,
}

/// Nearest-city lookup backing the location classifier.
///
/// Implementations may fail (remote index, database); the classifier
/// propagates those failures unchanged.
pub trait CityLookup: Send + Sync {
    /// Returns the city closest to the point, or `None` when none qualifies.
    fn nearest_city(&self, latitude: f64, longitude: f64)
    -> Result<Option<City>, CollaboratorError>;
}

impl<T: CityLookup + ?Sized> CityLookup for &T {
    fn nearest_city(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<City>, CollaboratorError> {
        (**self).nearest_city(latitude, longitude)
    }
}
