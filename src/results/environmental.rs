use serde::Serialize;

use crate::facility::Facility;

/// Grid emission factor (kg CO2 per kWh).
pub const CO2_KG_PER_KWH: f64 = 0.7;
/// CO2 absorbed by one tree per year (kg).
pub const CO2_KG_PER_TREE: f64 = 20.0;
/// CO2 emitted by one car per year (kg).
pub const CO2_KG_PER_CAR: f64 = 2000.0;

/// Emissions avoided by on-site PV production.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    /// PV energy produced per year (kWh).
    pub annual_pv_production_kwh: f64,
    /// CO2 avoided per year (tonnes).
    pub co2_avoided_tonnes: f64,
    pub equivalent_trees: f64,
    pub equivalent_cars: f64,
}

/// Computes the yearly environmental impact at a given autonomy.
pub fn environmental_impact(facility: &Facility, autonomy_pct: f64) -> EnvironmentalImpact {
    let monthly_consumption = facility.monthly_consumption();
    let annual_pv_production_kwh = monthly_consumption * 12.0 * autonomy_pct / 100.0;
    let co2_avoided_tonnes = annual_pv_production_kwh * CO2_KG_PER_KWH / 1000.0;

    EnvironmentalImpact {
        annual_pv_production_kwh,
        co2_avoided_tonnes,
        equivalent_trees: co2_avoided_tonnes * 1000.0 / CO2_KG_PER_TREE,
        equivalent_cars: co2_avoided_tonnes / (CO2_KG_PER_CAR / 1000.0),
    }
}
