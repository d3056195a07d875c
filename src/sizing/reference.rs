//! Simplified yield model driven by the `[sizing]` configuration section.
//!
//! Production is `kWc × peak_sun_hours(tier) × performance_ratio × days`,
//! with 5 m² of panel per kWc. It is a stand-in for a proper PV yield
//! simulation, sized so the pipeline has consistent numbers to work with.

use super::{ProductionModel, SizingModel};
use crate::config::SizingConfig;
use crate::error::{Collaborator, CollaboratorError};
use crate::facility::{IrradiationTier, PV_AREA_PER_KWC_M2};

/// Days per billing month used for monthly sizing.
const DAYS_PER_MONTH: f64 = 30.0;

/// Reference implementation of [`SizingModel`] and [`ProductionModel`].
#[derive(Debug, Clone)]
pub struct ReferenceSizing {
    config: SizingConfig,
}

impl ReferenceSizing {
    pub fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    /// Daily energy per installed kWc for a tier (kWh/kWc/day).
    pub fn daily_yield_per_kwc(&self, tier: IrradiationTier) -> f64 {
        self.config.peak_sun_hours(tier) * self.config.performance_ratio
    }

    fn check_consumption(monthly_consumption_kwh: f64) -> Result<(), CollaboratorError> {
        if monthly_consumption_kwh.is_finite() && monthly_consumption_kwh >= 0.0 {
            Ok(())
        } else {
            Err(CollaboratorError::new(
                Collaborator::Sizing,
                format!("monthly consumption must be >= 0, got {monthly_consumption_kwh}"),
            ))
        }
    }
}

impl Default for ReferenceSizing {
    fn default() -> Self {
        Self::new(SizingConfig::default())
    }
}

impl SizingModel for ReferenceSizing {
    fn recommended_pv_power(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        Self::check_consumption(monthly_consumption_kwh)?;
        Ok(monthly_consumption_kwh / (DAYS_PER_MONTH * self.daily_yield_per_kwc(tier)))
    }

    fn recommended_battery_capacity(
        &self,
        monthly_consumption_kwh: f64,
    ) -> Result<f64, CollaboratorError> {
        Self::check_consumption(monthly_consumption_kwh)?;
        let avg_kw = monthly_consumption_kwh / (DAYS_PER_MONTH * 24.0);
        Ok(avg_kw * self.config.backup_hours / self.config.depth_of_discharge)
    }

    fn energy_autonomy(
        &self,
        surface_m2: f64,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        Self::check_consumption(monthly_consumption_kwh)?;
        if monthly_consumption_kwh == 0.0 {
            return Ok(0.0);
        }
        let monthly_kwh = self.pv_production_for_period(surface_m2, tier, 30)?;
        Ok((monthly_kwh / monthly_consumption_kwh * 100.0).clamp(0.0, 100.0))
    }

    fn recommended_pv_surface(
        &self,
        monthly_consumption_kwh: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        Ok(self.recommended_pv_power(monthly_consumption_kwh, tier)? * PV_AREA_PER_KWC_M2)
    }

    fn annual_savings(
        &self,
        monthly_consumption_kwh: f64,
        autonomy_pct: f64,
        tariff_per_kwh: f64,
    ) -> Result<f64, CollaboratorError> {
        Self::check_consumption(monthly_consumption_kwh)?;
        Ok(monthly_consumption_kwh * autonomy_pct / 100.0 * tariff_per_kwh * 12.0)
    }
}

impl ProductionModel for ReferenceSizing {
    fn pv_production_for_period(
        &self,
        surface_m2: f64,
        tier: IrradiationTier,
        days: u32,
    ) -> Result<f64, CollaboratorError> {
        if !surface_m2.is_finite() || surface_m2 < 0.0 {
            return Err(CollaboratorError::new(
                Collaborator::Production,
                format!("surface must be >= 0, got {surface_m2}"),
            ));
        }
        let kwc = surface_m2 / PV_AREA_PER_KWC_M2;
        Ok(kwc * self.daily_yield_per_kwc(tier) * f64::from(days))
    }
}
