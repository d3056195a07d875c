use serde::Serialize;

/// Global performance score out of 100, split in four 25-point categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalScore {
    pub global_score: f64,
    pub autonomy_score: f64,
    /// Binary: 25 when the project saves money at all, 0 otherwise.
    pub economic_score: f64,
    pub resilience_score: f64,
    pub environmental_score: f64,
}

/// Scores a sizing on autonomy, economics, resilience, and environment.
pub fn global_score(
    autonomy_pct: f64,
    annual_savings: f64,
    battery_capacity_kwh: f64,
    co2_avoided_tonnes: f64,
) -> GlobalScore {
    let autonomy_score = autonomy_pct / 100.0 * 25.0;
    let economic_score = if annual_savings > 0.0 { 25.0 } else { 0.0 };
    let resilience_score = resilience_score(battery_capacity_kwh, autonomy_pct);
    let environmental_score = (co2_avoided_tonnes / 10.0 * 25.0).min(25.0);

    GlobalScore {
        global_score: autonomy_score + economic_score + resilience_score + environmental_score,
        autonomy_score,
        economic_score,
        resilience_score,
        environmental_score,
    }
}

/// Resilience out of 25: up to 15 for storage (full at 1 MWh), up to 10 for autonomy.
///
/// Called with `autonomy_pct = 0` for the storage-only reliability score.
pub fn resilience_score(battery_capacity_kwh: f64, autonomy_pct: f64) -> f64 {
    let battery_score = (battery_capacity_kwh / 1000.0 * 15.0).min(15.0);
    let autonomy_score = autonomy_pct / 100.0 * 10.0;
    battery_score + autonomy_score
}
