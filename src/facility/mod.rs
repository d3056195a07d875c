mod tier;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use tier::IrradiationTier;

/// Monthly consumption assumed when a facility does not report one (kWh).
pub const DEFAULT_MONTHLY_CONSUMPTION_KWH: f64 = 50_000.0;

/// Panel area occupied by one kWc of installed PV (m²).
pub const PV_AREA_PER_KWC_M2: f64 = 5.0;

/// Healthcare establishment categories.
///
/// Tags follow the Moroccan health-map nomenclature. Unrecognized tags
/// deserialize to [`EstablishmentType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EstablishmentType {
    /// Centre hospitalier universitaire.
    UniversityHospital,
    RegionalHospital,
    PrefectoralHospital,
    ProvincialHospital,
    GeneralHospital,
    SpecializedHospital,
    RegionalOncologyCenter,
    HemodialysisCenter,
    RehabilitationCenter,
    AddictionCenter,
    PalliativeCareCenter,
    /// Unité mobile hospitalière.
    MobileHospitalUnit,
    /// Unité médicale de proximité.
    MobileMedicalUnit,
    /// Unité de proximité hospitalière.
    EmergencyUnit,
    PrimaryCareCenter,
    PrivateClinic,
    #[default]
    Other,
}

impl EstablishmentType {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::UniversityHospital => "CHU",
            Self::RegionalHospital => "HOPITAL_REGIONAL",
            Self::PrefectoralHospital => "HOPITAL_PREFECTORAL",
            Self::ProvincialHospital => "HOPITAL_PROVINCIAL",
            Self::GeneralHospital => "HOPITAL_GENERAL",
            Self::SpecializedHospital => "HOPITAL_SPECIALISE",
            Self::RegionalOncologyCenter => "CENTRE_REGIONAL_ONCOLOGIE",
            Self::HemodialysisCenter => "CENTRE_HEMODIALYSE",
            Self::RehabilitationCenter => "CENTRE_REEDUCATION",
            Self::AddictionCenter => "CENTRE_ADDICTOLOGIE",
            Self::PalliativeCareCenter => "CENTRE_SOINS_PALLIATIFS",
            Self::MobileHospitalUnit => "UMH",
            Self::MobileMedicalUnit => "UMP",
            Self::EmergencyUnit => "UPH",
            Self::PrimaryCareCenter => "CENTRE_SANTE_PRIMAIRE",
            Self::PrivateClinic => "CLINIQUE_PRIVEE",
            Self::Other => "AUTRE",
        }
    }

    /// Catchment-size factor applied to the tier's base population.
    pub fn population_factor(self) -> f64 {
        match self {
            Self::UniversityHospital => 1.5,
            Self::RegionalHospital => 1.2,
            Self::SpecializedHospital => 1.1,
            Self::PrefectoralHospital | Self::ProvincialHospital | Self::GeneralHospital => 1.0,
            Self::RegionalOncologyCenter | Self::HemodialysisCenter => 1.0,
            Self::RehabilitationCenter | Self::AddictionCenter | Self::PalliativeCareCenter => 0.8,
            Self::MobileHospitalUnit | Self::MobileMedicalUnit | Self::EmergencyUnit => 0.7,
            Self::PrimaryCareCenter => 0.5,
            Self::PrivateClinic => 0.9,
            Self::Other => 1.0,
        }
    }
}

impl From<&str> for EstablishmentType {
    fn from(tag: &str) -> Self {
        match tag {
            "CHU" => Self::UniversityHospital,
            "HOPITAL_REGIONAL" => Self::RegionalHospital,
            "HOPITAL_PREFECTORAL" => Self::PrefectoralHospital,
            "HOPITAL_PROVINCIAL" => Self::ProvincialHospital,
            "HOPITAL_GENERAL" => Self::GeneralHospital,
            "HOPITAL_SPECIALISE" => Self::SpecializedHospital,
            "CENTRE_REGIONAL_ONCOLOGIE" => Self::RegionalOncologyCenter,
            "CENTRE_HEMODIALYSE" => Self::HemodialysisCenter,
            "CENTRE_REEDUCATION" => Self::RehabilitationCenter,
            "CENTRE_ADDICTOLOGIE" => Self::AddictionCenter,
            "CENTRE_SOINS_PALLIATIFS" => Self::PalliativeCareCenter,
            "UMH" => Self::MobileHospitalUnit,
            "UMP" => Self::MobileMedicalUnit,
            "UPH" => Self::EmergencyUnit,
            "CENTRE_SANTE_PRIMAIRE" => Self::PrimaryCareCenter,
            "CLINIQUE_PRIVEE" => Self::PrivateClinic,
            _ => Self::Other,
        }
    }
}

impl From<String> for EstablishmentType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<EstablishmentType> for String {
    fn from(kind: EstablishmentType) -> Self {
        kind.as_tag().to_string()
    }
}

impl fmt::Display for EstablishmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A healthcare facility considered for a microgrid retrofit.
///
/// Every field is optional input; accessors resolve the documented
/// defaults so calculators never see a missing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Facility {
    /// Display name.
    pub name: String,
    pub establishment_type: EstablishmentType,
    /// Monthly electricity consumption (kWh).
    pub monthly_consumption_kwh: Option<f64>,
    /// Roof or ground surface available for panels (m²).
    pub installable_surface_m2: Option<f64>,
    pub existing_pv_installed: Option<bool>,
    /// Installed power of the existing array (kWc).
    pub existing_pv_power_kwc: Option<f64>,
    pub irradiation_tier: Option<IrradiationTier>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub number_of_beds: Option<u32>,
}

impl Facility {
    /// Monthly consumption, defaulting to 50 000 kWh.
    pub fn monthly_consumption(&self) -> f64 {
        self.monthly_consumption_kwh
            .unwrap_or(DEFAULT_MONTHLY_CONSUMPTION_KWH)
    }

    /// Irradiation tier, defaulting to `C`.
    pub fn tier(&self) -> IrradiationTier {
        self.irradiation_tier.unwrap_or_default()
    }

    /// Whether the facility reports an existing PV installation.
    pub fn has_existing_pv(&self) -> bool {
        self.existing_pv_installed.unwrap_or(false)
    }

    /// Surface of the existing array, when one is reported with positive power.
    pub fn existing_pv_surface_m2(&self) -> Option<f64> {
        if !self.has_existing_pv() {
            return None;
        }
        self.existing_pv_power_kwc
            .filter(|kwc| *kwc > 0.0)
            .map(|kwc| kwc * PV_AREA_PER_KWC_M2)
    }

    /// Declared installable surface, only when strictly positive.
    pub fn declared_surface_m2(&self) -> Option<f64> {
        self.installable_surface_m2.filter(|m2| *m2 > 0.0)
    }

    /// Coordinates as a pair, only when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
