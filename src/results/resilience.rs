use serde::Serialize;

use super::score::resilience_score;
use crate::facility::Facility;

/// Share of the average load considered critical (ICU, theatres, cold chain).
pub const CRITICAL_LOAD_RATIO: f64 = 0.6;

/// Backup capability of the battery during a grid outage.
///
/// Hour figures are `None` when the facility has no load, meaning the
/// battery would last indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResilienceMetrics {
    /// Hours of full-load backup.
    pub autonomy_hours: Option<f64>,
    /// Hours of critical-load backup.
    pub critical_autonomy_hours: Option<f64>,
    /// Storage-only resilience score (0..=15).
    pub reliability_score: f64,
}

pub fn resilience_metrics(facility: &Facility, battery_capacity_kwh: f64) -> ResilienceMetrics {
    let avg_consumption_kw = facility.monthly_consumption() / (30.0 * 24.0);
    let critical_consumption_kw = avg_consumption_kw * CRITICAL_LOAD_RATIO;

    ResilienceMetrics {
        autonomy_hours: hours_of_backup(battery_capacity_kwh, avg_consumption_kw),
        critical_autonomy_hours: hours_of_backup(battery_capacity_kwh, critical_consumption_kw),
        reliability_score: resilience_score(battery_capacity_kwh, 0.0),
    }
}

fn hours_of_backup(capacity_kwh: f64, load_kw: f64) -> Option<f64> {
    (load_kw > 0.0).then(|| capacity_kwh / load_kw)
}
