//! Stage-boundary observability for the results pipeline.
//!
//! The pipeline itself never logs; it reports each completed stage to a
//! [`StageObserver`]. [`TracingObserver`] forwards stages to `tracing`.

use tracing::{debug, info, warn};

use crate::advisor::{Enhancement, SizingRecommendation};
use crate::facility::IrradiationTier;

/// A completed pipeline stage and the values it produced.
#[derive(Debug, Clone, Copy)]
pub enum Stage<'a> {
    InputsResolved {
        tier: IrradiationTier,
        monthly_consumption_kwh: f64,
    },
    BaselineSized(SizingRecommendation),
    Enhanced {
        sizing: SizingRecommendation,
        outcome: &'a Enhancement,
    },
    AutonomyComputed {
        autonomy_pct: f64,
        current_autonomy_pct: f64,
    },
    SavingsComputed {
        annual_savings: f64,
        installation_cost: f64,
    },
    Completed {
        global_score: f64,
    },
}

impl Stage<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InputsResolved { .. } => "inputs",
            Self::BaselineSized(_) => "baseline",
            Self::Enhanced { .. } => "enhancement",
            Self::AutonomyComputed { .. } => "autonomy",
            Self::SavingsComputed { .. } => "savings",
            Self::Completed { .. } => "completed",
        }
    }
}

/// Receives pipeline stage notifications.
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, stage: &Stage<'_>);
}

/// Observer that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl StageObserver for SilentObserver {
    fn on_stage(&self, _: &Stage<'_>) {}
}

/// Observer emitting one `tracing` event per stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn on_stage(&self, stage: &Stage<'_>) {
        match stage {
            Stage::InputsResolved {
                tier,
                monthly_consumption_kwh,
            } => debug!(%tier, monthly_consumption_kwh, "inputs resolved"),
            Stage::BaselineSized(sizing) => debug!(
                pv_power_kw = sizing.pv_power_kw,
                battery_capacity_kwh = sizing.battery_capacity_kwh,
                "baseline sizing"
            ),
            Stage::Enhanced { sizing, outcome } => match outcome {
                Enhancement::Applied { adjustments } => {
                    for adj in adjustments {
                        info!(
                            target_figure = ?adj.target,
                            from = adj.from,
                            to = adj.to,
                            "ML adjustment applied"
                        );
                    }
                    debug!(
                        pv_power_kw = sizing.pv_power_kw,
                        battery_capacity_kwh = sizing.battery_capacity_kwh,
                        "refined sizing"
                    );
                }
                Enhancement::NotApplied => debug!("ML recommendations left baseline unchanged"),
                Enhancement::Failed { reason } => {
                    warn!(%reason, "ML advisor unavailable, keeping baseline sizing");
                }
            },
            Stage::AutonomyComputed {
                autonomy_pct,
                current_autonomy_pct,
            } => debug!(autonomy_pct, current_autonomy_pct, "autonomy computed"),
            Stage::SavingsComputed {
                annual_savings,
                installation_cost,
            } => debug!(annual_savings, installation_cost, "savings and cost computed"),
            Stage::Completed { global_score } => info!(global_score, "results computed"),
        }
    }
}
