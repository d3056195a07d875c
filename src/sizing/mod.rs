/// Config-driven stand-in sizing and production model.
pub mod reference;

use crate::error::CollaboratorError;
use crate::facility::IrradiationTier;

pub use reference::ReferenceSizing;

/// Baseline physical sizing of a microgrid.
///
/// A required collaborator: any error aborts the results pipeline.
pub trait SizingModel: Send + Sync {
    /// Recommended PV power for a monthly consumption (kW).
    fn recommended_pv_power(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError>;

    /// Recommended battery capacity for a monthly consumption (kWh).
    fn recommended_battery_capacity(
        &self,
        monthly_consumption_kwh: f64,
    ) -> Result<f64, CollaboratorError>;

    /// Share of monthly consumption covered by a PV surface (percent, 0..=100).
    fn energy_autonomy(
        &self,
        surface_m2: f64,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError>;

    /// Panel surface recommended for a monthly consumption (m²).
    fn recommended_pv_surface(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError>;

    /// Yearly bill reduction at a given autonomy and tariff (currency/yr).
    fn annual_savings(
        &self,
        monthly_consumption_kwh: f64,
        autonomy_pct: f64,
        tariff_per_kwh: f64,
    ) -> Result<f64, CollaboratorError>;
}

/// PV energy yield over a period.
pub trait ProductionModel: Send + Sync {
    /// Energy produced by `surface_m2` of panels over `days` (kWh).
    fn pv_production_for_period(
        &self,
        surface_m2: f64,
        tier: IrradiationTier,
        days: u32,
    ) -> Result<f64, CollaboratorError>;
}

impl<T: SizingModel + ?Sized> SizingModel for &T {
    fn recommended_pv_power(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        (**self).recommended_pv_power(monthly_consumption_kwh, tier)
    }

    fn recommended_battery_capacity(
        &self,
        monthly_consumption_kwh: f64,
    ) -> Result<f64, CollaboratorError> {
        (**self).recommended_battery_capacity(monthly_consumption_kwh)
    }

    fn energy_autonomy(
        &self,
        surface_m2: f64,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        (**self).energy_autonomy(surface_m2, monthly_consumption_kwh, tier)
    }

    fn recommended_pv_surface(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        (**self).recommended_pv_surface(monthly_consumption_kwh, tier)
    }

    fn annual_savings(
        &self,
        monthly_consumption_kwh: f64,
        autonomy_pct: f64,
        tariff_per_kwh: f64,
    ) -> Result<f64, CollaboratorError> {
        (**self).annual_savings(monthly_consumption_kwh, autonomy_pct, tariff_per_kwh)
    }
}

impl<T: ProductionModel + ?Sized> ProductionModel for &T {
    fn pv_production_for_period(
        &self,
        surface_m2: f64,
        tier: IrradiationTier,
        days: u32,
    ) -> Result<f64, CollaboratorError> {
        (**self).pv_production_for_period(surface_m2, tier, days)
    }
}
