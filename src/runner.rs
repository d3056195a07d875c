//! Config-driven assessment: wires the reference collaborators, classifies
//! the facility's location, and runs the results engine.

use serde::Serialize;
use tracing::info;

use crate::advisor::{MlAdvisor, StaticAdvisor, UnavailableAdvisor};
use crate::config::{AssessmentConfig, LocationConfig};
use crate::error::{AssessmentError, CatalogError};
use crate::facility::IrradiationTier;
use crate::location::{City, CityCatalog, Classification, LocationClassifier};
use crate::results::{ComprehensiveResult, ResultsEngine};
use crate::sizing::ReferenceSizing;
use crate::telemetry::{StageObserver, TracingObserver};

/// What the classifier found around the facility's coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub nearest_city: Option<City>,
    pub irradiation_tier: IrradiationTier,
    pub estimated_population: u32,
    /// True when the facility declared no tier and this one was used.
    pub tier_inferred: bool,
}

/// Output of one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub facility_name: String,
    /// `None` when the facility has no coordinates.
    pub location: Option<LocationSummary>,
    pub results: ComprehensiveResult,
}

/// Loads the city catalog named by `[location]`, if any.
///
/// # Errors
///
/// Returns a `CatalogError` if the CSV cannot be read or has invalid rows.
pub fn load_catalog(config: &LocationConfig) -> Result<Option<CityCatalog>, CatalogError> {
    let Some(path) = config.cities_csv.as_deref() else {
        return Ok(None);
    };
    let catalog = CityCatalog::from_csv_path(path)?;
    info!(path = %path.display(), cities = catalog.len(), "city catalog loaded");
    Ok(Some(match config.max_distance_km {
        Some(km) => catalog.with_max_distance_km(km),
        None => catalog,
    }))
}

/// Runs an assessment with stage logging through `tracing`.
///
/// # Errors
///
/// See [`assess_with_observer`].
pub fn assess(
    config: &AssessmentConfig,
    catalog: Option<&CityCatalog>,
) -> Result<Assessment, AssessmentError> {
    assess_with_observer(config, catalog, TracingObserver)
}

/// Validates the configuration, classifies the location, and computes results.
///
/// Without a catalog, tiers fall back to latitude bands. A tier declared on
/// the facility always wins over the classified one.
///
/// # Arguments
///
/// * `config` - Assessment configuration
/// * `catalog` - Reference cities for nearest-city lookups
/// * `observer` - Receives pipeline stage notifications
///
/// # Errors
///
/// Returns an `AssessmentError` if validation fails, the location lookup
/// fails, or a required collaborator fails.
pub fn assess_with_observer(
    config: &AssessmentConfig,
    catalog: Option<&CityCatalog>,
    observer: impl StageObserver + 'static,
) -> Result<Assessment, AssessmentError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(AssessmentError::Invalid(errors));
    }

    let mut facility = config.facility.clone();
    let empty = CityCatalog::default();
    let classifier = LocationClassifier::new(catalog.unwrap_or(&empty));

    let location = match facility.coordinates() {
        Some((lat, lon)) => {
            let Classification {
                nearest_city,
                irradiation_tier,
                estimated_population,
            } = classifier
                .classify(
                    lat,
                    lon,
                    facility.establishment_type,
                    facility.number_of_beds,
                )
                .map_err(AssessmentError::Location)?;

            let tier_inferred = facility.irradiation_tier.is_none();
            if tier_inferred {
                facility.irradiation_tier = Some(irradiation_tier);
            }
            info!(
                tier = %irradiation_tier,
                population = estimated_population,
                inferred = tier_inferred,
                "location classified"
            );
            Some(LocationSummary {
                nearest_city,
                irradiation_tier,
                estimated_population,
                tier_inferred,
            })
        }
        None => None,
    };

    let sizing = ReferenceSizing::new(config.sizing.clone());
    let static_advisor = StaticAdvisor::new(config.advisor.recommendations.clone());
    let advisor: &dyn MlAdvisor = if config.advisor.enabled {
        &static_advisor
    } else {
        &UnavailableAdvisor
    };

    let engine = ResultsEngine::new(&sizing, &sizing, advisor).with_observer(observer);
    let results = engine.calculate_all_results(&facility)?;

    Ok(Assessment {
        facility_name: facility.name,
        location,
        results,
    })
}
