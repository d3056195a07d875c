use serde::Serialize;

use super::GRID_TARIFF_PER_KWH;
use crate::error::CollaboratorError;
use crate::facility::Facility;
use crate::sizing::{ProductionModel, SizingModel};

/// Electricity bills before and after the new microgrid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeforeAfterComparison {
    pub before_monthly_bill: f64,
    pub after_monthly_bill: f64,
    pub before_annual_bill: f64,
    pub after_annual_bill: f64,
    /// Energy still drawn from the grid each month (kWh).
    pub before_grid_consumption_kwh: f64,
    pub after_grid_consumption_kwh: f64,
    pub before_autonomy_pct: f64,
    pub after_autonomy_pct: f64,
    /// Monthly production of the existing array (kWh), 0 without one.
    pub before_pv_production_kwh: f64,
    pub autonomy_gain_pct: f64,
    pub monthly_savings_gain: f64,
    pub annual_savings_gain: f64,
    pub has_existing_pv: bool,
}

/// Compares the current bill, accounting for any existing PV, with the bill
/// at `new_autonomy_pct`.
///
/// # Errors
///
/// Propagates sizing or production collaborator failures.
pub fn before_after_comparison<S, P>(
    sizing: &S,
    production: &P,
    facility: &Facility,
    new_autonomy_pct: f64,
) -> Result<BeforeAfterComparison, CollaboratorError>
where
    S: SizingModel + ?Sized,
    P: ProductionModel + ?Sized,
{
    let monthly_consumption = facility.monthly_consumption();
    let tier = facility.tier();

    let (before_autonomy_pct, before_pv_production_kwh) = match facility.existing_pv_surface_m2() {
        Some(surface) => (
            sizing.energy_autonomy(surface, monthly_consumption, tier)?,
            production.pv_production_for_period(surface, tier, 30)?,
        ),
        None => (0.0, 0.0),
    };

    let before_grid_consumption_kwh = monthly_consumption * (1.0 - before_autonomy_pct / 100.0);
    let before_monthly_bill = before_grid_consumption_kwh * GRID_TARIFF_PER_KWH;

    let after_grid_consumption_kwh = monthly_consumption * (1.0 - new_autonomy_pct / 100.0);
    let after_monthly_bill = after_grid_consumption_kwh * GRID_TARIFF_PER_KWH;

    let monthly_savings_gain = before_monthly_bill - after_monthly_bill;

    Ok(BeforeAfterComparison {
        before_monthly_bill,
        after_monthly_bill,
        before_annual_bill: before_monthly_bill * 12.0,
        after_annual_bill: after_monthly_bill * 12.0,
        before_grid_consumption_kwh,
        after_grid_consumption_kwh,
        before_autonomy_pct,
        after_autonomy_pct: new_autonomy_pct,
        before_pv_production_kwh,
        autonomy_gain_pct: new_autonomy_pct - before_autonomy_pct,
        monthly_savings_gain,
        annual_savings_gain: monthly_savings_gain * 12.0,
        has_existing_pv: facility.has_existing_pv(),
    })
}
