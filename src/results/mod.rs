pub mod comparison;
pub mod cost;
pub mod environmental;
pub mod financial;
pub mod resilience;
pub mod score;

use std::fmt;

use serde::Serialize;

use crate::advisor::{self, Enhancement, MlAdvisor, SizingRecommendation};
use crate::error::{CollaboratorError, ResultsError};
use crate::facility::{Facility, IrradiationTier};
use crate::sizing::{ProductionModel, SizingModel};
use crate::telemetry::{Stage, StageObserver, TracingObserver};

pub use comparison::{BeforeAfterComparison, before_after_comparison};
pub use cost::{CostBreakdown, estimate_installation_cost};
pub use environmental::{EnvironmentalImpact, environmental_impact};
pub use financial::{FinancialAnalysis, Payback, financial_analysis};
pub use resilience::{ResilienceMetrics, resilience_metrics};
pub use score::{GlobalScore, global_score, resilience_score};

/// Grid electricity price used for savings and bills (currency per kWh).
pub const GRID_TARIFF_PER_KWH: f64 = 1.2;
/// Horizon of the financial analysis (years).
pub const FINANCIAL_HORIZON_YEARS: u32 = 20;

/// Complete sizing, financial, environmental, and resilience report.
///
/// Built fresh by every [`ResultsEngine::calculate_all_results`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveResult {
    pub irradiation_tier: IrradiationTier,
    pub monthly_consumption_kwh: f64,
    /// Recommended PV power after ML refinement (kW).
    pub recommended_pv_power_kw: f64,
    /// Recommended battery capacity after ML refinement (kWh).
    pub recommended_battery_capacity_kwh: f64,
    pub autonomy_pct: f64,
    /// Savings on top of what existing PV already yields (currency/yr).
    pub annual_savings: f64,
    pub installation_cost: CostBreakdown,
    pub environmental: EnvironmentalImpact,
    pub global_score: GlobalScore,
    pub financial: FinancialAnalysis,
    pub resilience: ResilienceMetrics,
    pub before_after: BeforeAfterComparison,
    /// Set whenever the ML step was attempted, whatever its outcome.
    pub enhancement_attempted: bool,
    pub enhancement: Enhancement,
}

/// Orchestrates sizing, ML refinement, and the derived-metric calculators.
///
/// Holds no mutable state: one engine can serve concurrent callers as long
/// as its collaborators can.
pub struct ResultsEngine<S, P, M> {
    sizing: S,
    production: P,
    advisor: M,
    observer: Box<dyn StageObserver>,
}

impl<S, P, M> ResultsEngine<S, P, M>
where
    S: SizingModel,
    P: ProductionModel,
    M: MlAdvisor,
{
    /// Creates an engine reporting stages through [`TracingObserver`].
    pub fn new(sizing: S, production: P, advisor: M) -> Self {
        Self {
            sizing,
            production,
            advisor,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replaces the stage observer.
    pub fn with_observer(mut self, observer: impl StageObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Runs the full pipeline for one facility.
    ///
    /// The ML advisor is best-effort: its failure leaves the baseline in
    /// place and is reported in [`ComprehensiveResult::enhancement`].
    ///
    /// # Errors
    ///
    /// Returns a `ResultsError` if the sizing or production collaborator
    /// fails. No partial result is produced.
    pub fn calculate_all_results(
        &self,
        facility: &Facility,
    ) -> Result<ComprehensiveResult, ResultsError> {
        // 1-2. Inputs with defaults
        let tier = facility.tier();
        let monthly_consumption = facility.monthly_consumption();
        self.observer.on_stage(&Stage::InputsResolved {
            tier,
            monthly_consumption_kwh: monthly_consumption,
        });

        // 3. Baseline physical sizing
        let baseline = SizingRecommendation {
            pv_power_kw: self
                .sizing
                .recommended_pv_power(monthly_consumption, tier)
                .map_err(ResultsError::at("baseline sizing"))?,
            battery_capacity_kwh: self
                .sizing
                .recommended_battery_capacity(monthly_consumption)
                .map_err(ResultsError::at("baseline sizing"))?,
        };
        self.observer.on_stage(&Stage::BaselineSized(baseline));

        // 4. ML refinement, never fatal
        let (sizing, enhancement) = advisor::enhance(&self.advisor, facility, baseline);
        self.observer.on_stage(&Stage::Enhanced {
            sizing,
            outcome: &enhancement,
        });

        // 5-6. Autonomy of the new design and of what is already installed
        let autonomy_pct = self
            .design_autonomy(facility, monthly_consumption, tier)
            .map_err(ResultsError::at("autonomy"))?;
        let current_autonomy_pct = self
            .current_autonomy(facility, monthly_consumption, tier)
            .map_err(ResultsError::at("current autonomy"))?;
        self.observer.on_stage(&Stage::AutonomyComputed {
            autonomy_pct,
            current_autonomy_pct,
        });

        let annual_savings = self
            .net_annual_savings(monthly_consumption, autonomy_pct, current_autonomy_pct)
            .map_err(ResultsError::at("savings"))?;

        // 7. Cost of the (possibly refined) design
        let installation_cost =
            CostBreakdown::estimate(sizing.pv_power_kw, sizing.battery_capacity_kwh);
        self.observer.on_stage(&Stage::SavingsComputed {
            annual_savings,
            installation_cost: installation_cost.total,
        });

        // 8. Derived metrics
        let environmental = environmental_impact(facility, autonomy_pct);
        let global_score = global_score(
            autonomy_pct,
            annual_savings,
            sizing.battery_capacity_kwh,
            environmental.co2_avoided_tonnes,
        );
        let financial = financial_analysis(
            installation_cost.total,
            annual_savings,
            FINANCIAL_HORIZON_YEARS,
        );
        let resilience = resilience_metrics(facility, sizing.battery_capacity_kwh);
        let before_after = self
            .before_after_comparison(facility, autonomy_pct)
            .map_err(ResultsError::at("before/after comparison"))?;

        self.observer.on_stage(&Stage::Completed {
            global_score: global_score.global_score,
        });

        // 9. Aggregate
        Ok(ComprehensiveResult {
            irradiation_tier: tier,
            monthly_consumption_kwh: monthly_consumption,
            recommended_pv_power_kw: sizing.pv_power_kw,
            recommended_battery_capacity_kwh: sizing.battery_capacity_kwh,
            autonomy_pct,
            annual_savings,
            installation_cost,
            environmental,
            global_score,
            financial,
            resilience,
            before_after,
            enhancement_attempted: true,
            enhancement,
        })
    }

    /// Before/after bill comparison using this engine's collaborators.
    ///
    /// # Errors
    ///
    /// Propagates sizing or production collaborator failures.
    pub fn before_after_comparison(
        &self,
        facility: &Facility,
        new_autonomy_pct: f64,
    ) -> Result<BeforeAfterComparison, CollaboratorError> {
        before_after_comparison(&self.sizing, &self.production, facility, new_autonomy_pct)
    }

    /// Autonomy of the new design: declared surface if positive, else the
    /// recommended surface.
    fn design_autonomy(
        &self,
        facility: &Facility,
        monthly_consumption: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        let surface = match facility.declared_surface_m2() {
            Some(surface) => surface,
            None => self.sizing.recommended_pv_surface(monthly_consumption, tier)?,
        };
        self.sizing.energy_autonomy(surface, monthly_consumption, tier)
    }

    /// Autonomy already provided by an existing installation, 0 without one.
    fn current_autonomy(
        &self,
        facility: &Facility,
        monthly_consumption: f64,
        tier: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        match facility.existing_pv_surface_m2() {
            Some(surface) => self.sizing.energy_autonomy(surface, monthly_consumption, tier),
            None => Ok(0.0),
        }
    }

    fn net_annual_savings(
        &self,
        monthly_consumption: f64,
        autonomy_pct: f64,
        current_autonomy_pct: f64,
    ) -> Result<f64, CollaboratorError> {
        let with_microgrid =
            self.sizing
                .annual_savings(monthly_consumption, autonomy_pct, GRID_TARIFF_PER_KWH)?;
        let already_realized = self.sizing.annual_savings(
            monthly_consumption,
            current_autonomy_pct,
            GRID_TARIFF_PER_KWH,
        )?;
        Ok(with_microgrid - already_realized)
    }
}

impl fmt::Display for ComprehensiveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Microgrid Results ---")?;
        writeln!(
            f,
            "Irradiation tier:      {} ({:.0} kWh/month)",
            self.irradiation_tier, self.monthly_consumption_kwh
        )?;
        writeln!(f, "PV power:              {:.1} kW", self.recommended_pv_power_kw)?;
        writeln!(
            f,
            "Battery capacity:      {:.1} kWh",
            self.recommended_battery_capacity_kwh
        )?;
        writeln!(f, "Autonomy:              {:.1}%", self.autonomy_pct)?;
        writeln!(f, "Annual savings:        {:.0}", self.annual_savings)?;
        writeln!(f, "Installation cost:     {:.0}", self.installation_cost.total)?;
        writeln!(f, "Payback (ROI):         {}", self.financial.roi)?;
        writeln!(
            f,
            "NPV ({} yr):           {:.0}",
            self.financial.horizon_years, self.financial.npv
        )?;
        writeln!(f, "IRR (simple):          {:.1}%", self.financial.irr_pct)?;
        writeln!(
            f,
            "CO2 avoided:           {:.1} t/yr ({:.0} trees, {:.1} cars)",
            self.environmental.co2_avoided_tonnes,
            self.environmental.equivalent_trees,
            self.environmental.equivalent_cars
        )?;
        match self.resilience.autonomy_hours {
            Some(hours) => writeln!(
                f,
                "Backup:                {:.1} h full load, {:.1} h critical",
                hours,
                self.resilience.critical_autonomy_hours.unwrap_or(hours)
            )?,
            None => writeln!(f, "Backup:                unbounded (no load)")?,
        }
        writeln!(
            f,
            "Bill:                  {:.0} -> {:.0} per month",
            self.before_after.before_monthly_bill, self.before_after.after_monthly_bill
        )?;
        let ml = match &self.enhancement {
            Enhancement::Applied { adjustments } => {
                format!("applied ({} adjustments)", adjustments.len())
            }
            Enhancement::NotApplied => "no change".to_string(),
            Enhancement::Failed { reason } => format!("failed: {reason}"),
        };
        writeln!(f, "ML refinement:         {ml}")?;
        write!(f, "Global score:          {:.1}/100", self.global_score.global_score)
    }
}
