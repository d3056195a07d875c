//! Irradiation tier and surrounding-population estimation from coordinates.

use tracing::debug;

use super::{City, CityLookup};
use crate::error::CollaboratorError;
use crate::facility::{EstablishmentType, IrradiationTier};

/// Population returned when coordinates are unknown.
pub const DEFAULT_POPULATION: u32 = 50_000;
/// Lower bound of any population estimate.
pub const MIN_POPULATION: u32 = 10_000;
/// Upper bound of any population estimate.
pub const MAX_POPULATION: u32 = 3_000_000;

/// Classifies a location's solar tier and catchment population.
///
/// Holds only the city lookup; every method is a pure function of its
/// arguments and the lookup's answer.
#[derive(Debug, Clone)]
pub struct LocationClassifier<L> {
    lookup: L,
}

impl<L: CityLookup> LocationClassifier<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolves the irradiation tier for a point.
    ///
    /// Missing coordinates give `C`. Otherwise the nearest city's tier is
    /// used, falling back to latitude bands when no city is found.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error if the nearest-city query fails.
    pub fn determine_irradiation_tier(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<IrradiationTier, CollaboratorError> {
        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            return Ok(IrradiationTier::C);
        };

        let city = self.lookup.nearest_city(lat, lon)?;
        Ok(tier_for(lat, city.as_ref()))
    }

    /// Nearest reference city, or `None` when coordinates are missing.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error if the query fails.
    pub fn nearest_city(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<City>, CollaboratorError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => self.lookup.nearest_city(lat, lon),
            _ => Ok(None),
        }
    }

    /// Nearest city, tier and population for a point from a single lookup.
    ///
    /// Gives the same answers as [`Self::nearest_city`],
    /// [`Self::determine_irradiation_tier`] and [`Self::estimate_population`]
    /// called separately.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error if the query fails.
    pub fn classify(
        &self,
        latitude: f64,
        longitude: f64,
        establishment_type: EstablishmentType,
        number_of_beds: Option<u32>,
    ) -> Result<Classification, CollaboratorError> {
        let nearest_city = self.lookup.nearest_city(latitude, longitude)?;
        let irradiation_tier = tier_for(latitude, nearest_city.as_ref());
        let factor = bed_adjusted_factor(establishment_type.population_factor(), number_of_beds);
        Ok(Classification {
            nearest_city,
            irradiation_tier,
            estimated_population: population_for(irradiation_tier, factor),
        })
    }

    /// Estimates the population served around a facility.
    ///
    /// The tier's base population is scaled by the establishment factor,
    /// adjusted by bed count, rounded and clamped to
    /// [`MIN_POPULATION`]..=[`MAX_POPULATION`].
    ///
    /// # Errors
    ///
    /// Returns the lookup's error if the tier query fails.
    pub fn estimate_population(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        establishment_type: EstablishmentType,
        number_of_beds: Option<u32>,
    ) -> Result<u32, CollaboratorError> {
        if latitude.is_none() || longitude.is_none() {
            return Ok(DEFAULT_POPULATION);
        }

        let tier = self.determine_irradiation_tier(latitude, longitude)?;
        let factor = bed_adjusted_factor(establishment_type.population_factor(), number_of_beds);
        Ok(population_for(tier, factor))
    }
}

/// Result of [`LocationClassifier::classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub nearest_city: Option<City>,
    pub irradiation_tier: IrradiationTier,
    pub estimated_population: u32,
}

fn tier_for(latitude: f64, city: Option<&City>) -> IrradiationTier {
    match city {
        Some(city) => {
            debug!(city = %city.name, tier = %city.tier, "tier from nearest city");
            city.tier
        }
        None => {
            let tier = IrradiationTier::from_latitude(latitude);
            debug!(latitude, %tier, "no city found, tier from latitude band");
            tier
        }
    }
}

/// Base population of the urban area typical for a tier.
pub fn base_population(tier: IrradiationTier) -> u32 {
    match tier {
        IrradiationTier::A | IrradiationTier::B => 800_000,
        IrradiationTier::C => 500_000,
        IrradiationTier::D => 100_000,
    }
}

/// Applies the bed-count override to an establishment factor.
///
/// Large facilities imply a large city, very small ones a small town.
pub fn bed_adjusted_factor(factor: f64, number_of_beds: Option<u32>) -> f64 {
    match number_of_beds {
        Some(beds) if beds > 500 => factor.max(1.5),
        Some(beds) if beds > 200 => factor.max(1.2),
        Some(beds) if beds > 0 && beds < 50 => factor.min(0.7),
        _ => factor,
    }
}

fn population_for(tier: IrradiationTier, factor: f64) -> u32 {
    let estimate = (f64::from(base_population(tier)) * factor).round();
    estimate.clamp(f64::from(MIN_POPULATION), f64::from(MAX_POPULATION)) as u32
}
