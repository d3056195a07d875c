//! CSV export for comprehensive results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::results::ComprehensiveResult;

/// Column header for the metric/value export.
const HEADER: [&str; 3] = ["section", "metric", "value"];

/// Exports a result to a CSV file at the given path.
///
/// # Arguments
///
/// * `result` - Result of one pipeline run
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &ComprehensiveResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a result as `section,metric,value` rows to any writer.
///
/// Values with no finite number (payback never reached, unbounded backup)
/// are written as `never` and `unbounded`. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &ComprehensiveResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for (section, metric, value) in rows(result) {
        wtr.write_record([section, metric, value.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

fn num(v: f64) -> String {
    format!("{v:.4}")
}

fn rows(r: &ComprehensiveResult) -> Vec<(&'static str, &'static str, String)> {
    let cost = &r.installation_cost;
    let env = &r.environmental;
    let score = &r.global_score;
    let fin = &r.financial;
    let res = &r.resilience;
    let ba = &r.before_after;
    let hours = |h: Option<f64>| h.map_or_else(|| "unbounded".to_string(), num);

    vec![
        ("sizing", "irradiation_tier", r.irradiation_tier.to_string()),
        ("sizing", "monthly_consumption_kwh", num(r.monthly_consumption_kwh)),
        ("sizing", "recommended_pv_power_kw", num(r.recommended_pv_power_kw)),
        ("sizing", "recommended_battery_capacity_kwh", num(r.recommended_battery_capacity_kwh)),
        ("sizing", "autonomy_pct", num(r.autonomy_pct)),
        ("sizing", "annual_savings", num(r.annual_savings)),
        ("sizing", "enhancement_attempted", r.enhancement_attempted.to_string()),
        ("sizing", "enhancement_applied", r.enhancement.is_applied().to_string()),
        ("cost", "pv", num(cost.pv)),
        ("cost", "battery", num(cost.battery)),
        ("cost", "inverter", num(cost.inverter)),
        ("cost", "installation", num(cost.installation)),
        ("cost", "total", num(cost.total)),
        ("environmental", "annual_pv_production_kwh", num(env.annual_pv_production_kwh)),
        ("environmental", "co2_avoided_tonnes", num(env.co2_avoided_tonnes)),
        ("environmental", "equivalent_trees", num(env.equivalent_trees)),
        ("environmental", "equivalent_cars", num(env.equivalent_cars)),
        ("score", "global", num(score.global_score)),
        ("score", "autonomy", num(score.autonomy_score)),
        ("score", "economic", num(score.economic_score)),
        ("score", "resilience", num(score.resilience_score)),
        ("score", "environmental", num(score.environmental_score)),
        (
            "financial",
            "roi_years",
            fin.roi.years().map_or_else(|| "never".to_string(), num),
        ),
        ("financial", "npv", num(fin.npv)),
        ("financial", "irr_pct", num(fin.irr_pct)),
        ("financial", "cumulative_savings_10", num(fin.cumulative_savings_10)),
        ("financial", "cumulative_savings_20", num(fin.cumulative_savings_20)),
        ("resilience", "autonomy_hours", hours(res.autonomy_hours)),
        ("resilience", "critical_autonomy_hours", hours(res.critical_autonomy_hours)),
        ("resilience", "reliability_score", num(res.reliability_score)),
        ("before_after", "before_monthly_bill", num(ba.before_monthly_bill)),
        ("before_after", "after_monthly_bill", num(ba.after_monthly_bill)),
        ("before_after", "before_annual_bill", num(ba.before_annual_bill)),
        ("before_after", "after_annual_bill", num(ba.after_annual_bill)),
        ("before_after", "before_autonomy_pct", num(ba.before_autonomy_pct)),
        ("before_after", "after_autonomy_pct", num(ba.after_autonomy_pct)),
        ("before_after", "autonomy_gain_pct", num(ba.autonomy_gain_pct)),
        ("before_after", "annual_savings_gain", num(ba.annual_savings_gain)),
        ("before_after", "has_existing_pv", ba.has_existing_pv.to_string()),
    ]
}
