use serde::Serialize;

/// PV modules (currency per kW).
pub const PV_COST_PER_KW: f64 = 2500.0;
/// Battery storage (currency per kWh).
pub const BATTERY_COST_PER_KWH: f64 = 4000.0;
/// Inverters (currency per kW of PV).
pub const INVERTER_COST_PER_KW: f64 = 2000.0;
/// Installation labour as a share of equipment cost.
pub const INSTALLATION_SURCHARGE: f64 = 0.2;

/// Itemized installation cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub pv: f64,
    pub battery: f64,
    pub inverter: f64,
    pub installation: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn estimate(pv_power_kw: f64, battery_capacity_kwh: f64) -> Self {
        let pv = pv_power_kw * PV_COST_PER_KW;
        let battery = battery_capacity_kwh * BATTERY_COST_PER_KWH;
        let inverter = pv_power_kw * INVERTER_COST_PER_KW;
        let equipment = pv + battery + inverter;
        let installation = equipment * INSTALLATION_SURCHARGE;
        Self {
            pv,
            battery,
            inverter,
            installation,
            total: equipment + installation,
        }
    }
}

/// Total installed cost: equipment plus the 20% installation surcharge.
pub fn estimate_installation_cost(pv_power_kw: f64, battery_capacity_kwh: f64) -> f64 {
    CostBreakdown::estimate(pv_power_kw, battery_capacity_kwh).total
}
