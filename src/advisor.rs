//! Best-effort ML refinement of the baseline sizing.
//!
//! The advisor is optional: its failures are recorded as
//! [`Enhancement::Failed`] and never abort a results computation.

use serde::{Deserialize, Serialize};

use crate::error::{Collaborator, CollaboratorError};
use crate::facility::Facility;

/// Recommendation type that can replace the PV power baseline.
pub const PV_POWER: &str = "pv_power";
/// Recommendation type that can replace the battery capacity baseline.
pub const BATTERY_CAPACITY: &str = "battery_capacity";

/// One entry returned by the ML advisor.
///
/// `value` is kept as raw JSON; only numeric values are ever applied.
/// Entries missing `type` or `value` still parse and are skipped by [`refine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlRecommendation {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MlRecommendation {
    pub fn numeric(kind: &str, value: f64) -> Self {
        Self {
            kind: kind.to_string(),
            value: serde_json::Value::from(value),
            message: None,
        }
    }
}

/// Source of ML sizing recommendations.
pub trait MlAdvisor: Send + Sync {
    fn recommendations(&self, facility: &Facility)
    -> Result<Vec<MlRecommendation>, CollaboratorError>;
}

impl<T: MlAdvisor + ?Sized> MlAdvisor for &T {
    fn recommendations(
        &self,
        facility: &Facility,
    ) -> Result<Vec<MlRecommendation>, CollaboratorError> {
        (**self).recommendations(facility)
    }
}

/// PV power and battery capacity under consideration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingRecommendation {
    pub pv_power_kw: f64,
    pub battery_capacity_kwh: f64,
}

/// Which figure an adjustment replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingTarget {
    PvPower,
    BatteryCapacity,
}

/// A baseline value replaced by an accepted ML recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub target: SizingTarget,
    pub from: f64,
    pub to: f64,
}

/// Outcome of the ML refinement step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enhancement {
    /// At least one recommendation replaced a baseline value.
    Applied { adjustments: Vec<Adjustment> },
    /// The advisor answered but nothing passed the plausibility guard.
    NotApplied,
    /// The advisor failed; the baseline was kept.
    Failed { reason: String },
}

impl Enhancement {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Applies recommendations to a baseline, in order.
///
/// A numeric `pv_power` or `battery_capacity` value replaces the current
/// figure only when strictly between 0 and twice that figure. Each entry is
/// compared against the figure as updated by earlier entries.
pub fn refine(
    baseline: SizingRecommendation,
    recommendations: &[MlRecommendation],
) -> (SizingRecommendation, Vec<Adjustment>) {
    let mut sizing = baseline;
    let mut adjustments = Vec::new();

    for rec in recommendations {
        let (target, current) = match rec.kind.as_str() {
            PV_POWER => (SizingTarget::PvPower, &mut sizing.pv_power_kw),
            BATTERY_CAPACITY => (SizingTarget::BatteryCapacity, &mut sizing.battery_capacity_kwh),
            _ => continue,
        };
        let Some(value) = rec.value.as_f64() else {
            continue;
        };
        if value > 0.0 && value < *current * 2.0 {
            adjustments.push(Adjustment {
                target,
                from: *current,
                to: value,
            });
            *current = value;
        }
    }

    (sizing, adjustments)
}

/// Runs the advisor and refinement, absorbing advisor failures.
pub fn enhance<M: MlAdvisor + ?Sized>(
    advisor: &M,
    facility: &Facility,
    baseline: SizingRecommendation,
) -> (SizingRecommendation, Enhancement) {
    match advisor.recommendations(facility) {
        Ok(recommendations) => {
            let (sizing, adjustments) = refine(baseline, &recommendations);
            if adjustments.is_empty() {
                (sizing, Enhancement::NotApplied)
            } else {
                (sizing, Enhancement::Applied { adjustments })
            }
        }
        Err(err) => (
            baseline,
            Enhancement::Failed {
                reason: err.to_string(),
            },
        ),
    }
}

/// Advisor answering with a fixed list, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisor {
    recommendations: Vec<MlRecommendation>,
}

impl StaticAdvisor {
    pub fn new(recommendations: Vec<MlRecommendation>) -> Self {
        Self { recommendations }
    }
}

impl MlAdvisor for StaticAdvisor {
    fn recommendations(&self, _: &Facility) -> Result<Vec<MlRecommendation>, CollaboratorError> {
        Ok(self.recommendations.clone())
    }
}

/// Advisor that is never reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAdvisor;

impl MlAdvisor for UnavailableAdvisor {
    fn recommendations(&self, _: &Facility) -> Result<Vec<MlRecommendation>, CollaboratorError> {
        Err(CollaboratorError::new(
            Collaborator::Advisor,
            "no ML advisor configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: SizingRecommendation = SizingRecommendation {
        pv_power_kw: 100.0,
        battery_capacity_kwh: 400.0,
    };

    #[test]
    fn accepts_values_inside_band() {
        let recs = vec![
            MlRecommendation::numeric(PV_POWER, 150.0),
            MlRecommendation::numeric(BATTERY_CAPACITY, 300.0),
        ];
        let (sizing, adjustments) = refine(BASE, &recs);
        assert_eq!(sizing.pv_power_kw, 150.0);
        assert_eq!(sizing.battery_capacity_kwh, 300.0);
        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].from, 100.0);
    }

    #[test]
    fn rejects_outliers_and_non_positive_values() {
        let recs = vec![
            MlRecommendation::numeric(PV_POWER, 200.0),
            MlRecommendation::numeric(PV_POWER, 0.0),
            MlRecommendation::numeric(PV_POWER, -10.0),
            MlRecommendation::numeric(BATTERY_CAPACITY, 1_000.0),
        ];
        let (sizing, adjustments) = refine(BASE, &recs);
        assert_eq!(sizing, BASE);
        assert!(adjustments.is_empty());
    }

    #[test]
    fn ignores_unknown_types_and_non_numeric_values() {
        let recs = vec![
            MlRecommendation::numeric("inverter_power", 50.0),
            MlRecommendation {
                kind: PV_POWER.to_string(),
                value: serde_json::Value::from("120"),
                message: None,
            },
            MlRecommendation {
                kind: BATTERY_CAPACITY.to_string(),
                value: serde_json::Value::Null,
                message: Some("insufficient history".to_string()),
            },
        ];
        let (sizing, adjustments) = refine(BASE, &recs);
        assert_eq!(sizing, BASE);
        assert!(adjustments.is_empty());
    }

    #[test]
    fn later_entries_compare_against_updated_value() {
        let recs = vec![
            MlRecommendation::numeric(PV_POWER, 60.0),
            // 150 < 2 * 100 but not < 2 * 60
            MlRecommendation::numeric(PV_POWER, 150.0),
        ];
        let (sizing, _) = refine(BASE, &recs);
        assert_eq!(sizing.pv_power_kw, 60.0);
    }

    #[test]
    fn failure_keeps_baseline() {
        let (sizing, outcome) = enhance(&UnavailableAdvisor, &Facility::default(), BASE);
        assert_eq!(sizing, BASE);
        assert!(matches!(outcome, Enhancement::Failed { .. }));
    }

    #[test]
    fn empty_answer_is_not_applied() {
        let (sizing, outcome) = enhance(&StaticAdvisor::default(), &Facility::default(), BASE);
        assert_eq!(sizing, BASE);
        assert_eq!(outcome, Enhancement::NotApplied);
        assert!(!outcome.is_applied());
    }

    #[test]
    fn deserializes_advisor_payload() {
        let json = r#"[{"type": "pv_power", "value": 120.5, "message": "history"}]"#;
        let recs: Vec<MlRecommendation> = serde_json::from_str(json).expect("valid payload");
        assert_eq!(recs[0].kind, PV_POWER);
        assert_eq!(recs[0].value.as_f64(), Some(120.5));
    }

    #[test]
    fn entries_without_value_or_type_are_skipped() {
        let json = r#"[
            {"type": "alert", "message": "battery aging"},
            {"value": 90.0},
            {"type": "pv_power", "value": 120.0}
        ]"#;
        let recs: Vec<MlRecommendation> = serde_json::from_str(json).expect("valid payload");
        assert_eq!(recs.len(), 3);
        assert!(recs[0].value.is_null());
        assert!(recs[1].kind.is_empty());

        let (sizing, adjustments) = refine(BASE, &recs);
        assert_eq!(sizing.pv_power_kw, 120.0);
        assert_eq!(sizing.battery_capacity_kwh, BASE.battery_capacity_kwh);
        assert_eq!(adjustments.len(), 1);
    }
}
