//! TOML-based assessment configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::advisor::{BATTERY_CAPACITY, MlRecommendation, PV_POWER};
use crate::error::ConfigError;
use crate::facility::{EstablishmentType, Facility, IrradiationTier};

/// Top-level assessment configuration parsed from TOML.
///
/// Every section has defaults. Load from TOML with
/// [`AssessmentConfig::from_toml_file`] or pick a built-in preset with
/// [`AssessmentConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentConfig {
    /// Facility under assessment.
    #[serde(default)]
    pub facility: Facility,
    /// Reference sizing model parameters.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// City catalog used for tier and population lookups.
    #[serde(default)]
    pub location: LocationConfig,
    /// ML advisor stand-in.
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

/// Reference sizing model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConfig {
    /// Peak sun hours per day for tier A (kWh/m²/day).
    pub peak_sun_hours_a: f64,
    pub peak_sun_hours_b: f64,
    pub peak_sun_hours_c: f64,
    pub peak_sun_hours_d: f64,
    /// System losses applied to nameplate yield (0.0–1.0).
    pub performance_ratio: f64,
    /// Hours of average load the battery must cover.
    pub backup_hours: f64,
    /// Usable share of battery capacity (0.0–1.0).
    pub depth_of_discharge: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            peak_sun_hours_a: 6.5,
            peak_sun_hours_b: 6.0,
            peak_sun_hours_c: 5.5,
            peak_sun_hours_d: 5.0,
            performance_ratio: 0.8,
            backup_hours: 4.0,
            depth_of_discharge: 0.8,
        }
    }
}

impl SizingConfig {
    pub fn peak_sun_hours(&self, tier: IrradiationTier) -> f64 {
        match tier {
            IrradiationTier::A => self.peak_sun_hours_a,
            IrradiationTier::B => self.peak_sun_hours_b,
            IrradiationTier::C => self.peak_sun_hours_c,
            IrradiationTier::D => self.peak_sun_hours_d,
        }
    }
}

/// City catalog parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    /// CSV file with `name,latitude,longitude,tier` rows.
    pub cities_csv: Option<PathBuf>,
    /// Cities farther than this are ignored (km).
    pub max_distance_km: Option<f64>,
}

/// ML advisor stand-in parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// When false the advisor is unavailable and the baseline is kept.
    pub enabled: bool,
    /// Recommendations returned verbatim when enabled.
    pub recommendations: Vec<MlRecommendation>,
}

impl AssessmentConfig {
    /// University hospital in Casablanca with a declared roof surface.
    pub fn chu() -> Self {
        Self {
            facility: Facility {
                name: "CHU Ibn Rochd".to_string(),
                establishment_type: EstablishmentType::UniversityHospital,
                monthly_consumption_kwh: Some(250_000.0),
                installable_surface_m2: Some(4_000.0),
                latitude: Some(33.58),
                longitude: Some(-7.62),
                number_of_beds: Some(1_200),
                ..Facility::default()
            },
            ..Self::default()
        }
    }

    /// Small primary-care center with no tier and no surface declared.
    pub fn rural_center() -> Self {
        Self {
            facility: Facility {
                name: "Centre de sante rural".to_string(),
                establishment_type: EstablishmentType::PrimaryCareCenter,
                monthly_consumption_kwh: Some(4_500.0),
                latitude: Some(29.5),
                longitude: Some(-9.0),
                number_of_beds: Some(12),
                ..Facility::default()
            },
            location: LocationConfig {
                cities_csv: None,
                max_distance_km: Some(50.0),
            },
            ..Self::default()
        }
    }

    /// Regional hospital that already runs a PV array, with ML hints.
    pub fn existing_pv() -> Self {
        Self {
            facility: Facility {
                name: "Hopital regional".to_string(),
                establishment_type: EstablishmentType::RegionalHospital,
                monthly_consumption_kwh: Some(120_000.0),
                existing_pv_installed: Some(true),
                existing_pv_power_kwc: Some(150.0),
                irradiation_tier: Some(IrradiationTier::B),
                number_of_beds: Some(320),
                ..Facility::default()
            },
            advisor: AdvisorConfig {
                enabled: true,
                recommendations: vec![
                    MlRecommendation::numeric(PV_POWER, 700.0),
                    MlRecommendation::numeric(BATTERY_CAPACITY, 900.0),
                ],
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "chu", "rural_center", "existing_pv"];

    /// Loads an assessment from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "chu" => Ok(Self::chu()),
            "rural_center" => Ok(Self::rural_center()),
            "existing_pv" => Ok(Self::existing_pv()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses an assessment from a TOML file.
    ///
    /// Relative `location.cities_csv` paths are resolved against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(csv), Some(dir)) = (cfg.location.cities_csv.as_mut(), path.parent()) {
            if csv.is_relative() {
                *csv = dir.join(&*csv);
            }
        }
        Ok(cfg)
    }

    /// Parses an assessment from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let f = &self.facility;
        let non_negative = [
            ("facility.monthly_consumption_kwh", f.monthly_consumption_kwh),
            ("facility.installable_surface_m2", f.installable_surface_m2),
            ("facility.existing_pv_power_kwc", f.existing_pv_power_kwc),
        ];
        for (field, value) in non_negative {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        if f.latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
            errors.push(ConfigError::new("facility.latitude", "must be in [-90, 90]"));
        }
        if f.longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
            errors.push(ConfigError::new("facility.longitude", "must be in [-180, 180]"));
        }

        let s = &self.sizing;
        for tier in IrradiationTier::ALL {
            if s.peak_sun_hours(tier) <= 0.0 {
                errors.push(ConfigError::new(
                    format!("sizing.peak_sun_hours_{}", tier.as_tag().to_lowercase()),
                    "must be > 0",
                ));
            }
        }
        if !(s.performance_ratio > 0.0 && s.performance_ratio <= 1.0) {
            errors.push(ConfigError::new("sizing.performance_ratio", "must be in (0.0, 1.0]"));
        }
        if !(s.depth_of_discharge > 0.0 && s.depth_of_discharge <= 1.0) {
            errors.push(ConfigError::new("sizing.depth_of_discharge", "must be in (0.0, 1.0]"));
        }
        if s.backup_hours < 0.0 {
            errors.push(ConfigError::new("sizing.backup_hours", "must be >= 0"));
        }

        if self.location.max_distance_km.is_some_and(|km| km <= 0.0) {
            errors.push(ConfigError::new("location.max_distance_km", "must be > 0"));
        }

        errors
    }
}
