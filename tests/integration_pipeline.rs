//! Integration tests for the results pipeline over the reference collaborators.

mod common;

use approx::assert_relative_eq;

use microgrid_results::advisor::{BATTERY_CAPACITY, Enhancement, PV_POWER, UnavailableAdvisor};
use microgrid_results::error::{Collaborator, ResultsError};
use microgrid_results::facility::{Facility, IrradiationTier};
use microgrid_results::results::{Payback, ResultsEngine};
use microgrid_results::sizing::ReferenceSizing;

use common::{FailOn, FailingProduction, FailingSizing, OfflineAdvisor, RecordingObserver};

#[test]
fn reference_hospital_figures() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let r = engine
        .calculate_all_results(&common::regional_hospital())
        .expect("reference run should succeed");

    assert_eq!(r.irradiation_tier, IrradiationTier::B);
    // 50 000 kWh / (30 d × 6.0 h × 0.8)
    assert_relative_eq!(r.recommended_pv_power_kw, 347.222_222_222_222_2, max_relative = 1e-12);
    // 1 000 m² = 200 kWc → 28 800 kWh/month
    assert_relative_eq!(r.autonomy_pct, 57.6, max_relative = 1e-12);
    assert_relative_eq!(r.annual_savings, 414_720.0, max_relative = 1e-12);
    assert_relative_eq!(
        r.installation_cost.total,
        (r.installation_cost.pv + r.installation_cost.battery + r.installation_cost.inverter) * 1.2,
        max_relative = 1e-12
    );
    assert_relative_eq!(r.environmental.co2_avoided_tonnes, 241.92, max_relative = 1e-12);
    assert_eq!(r.global_score.economic_score, 25.0);
    assert!(r.financial.roi.years().is_some());
    assert!(!r.before_after.has_existing_pv);
}

#[test]
fn missing_inputs_fall_back_to_defaults() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let r = engine
        .calculate_all_results(&Facility::default())
        .expect("default facility should succeed");

    assert_eq!(r.irradiation_tier, IrradiationTier::C);
    assert_eq!(r.monthly_consumption_kwh, 50_000.0);
    // No declared surface: the recommended surface covers the load
    assert_relative_eq!(r.autonomy_pct, 100.0, epsilon = 1e-9);
}

#[test]
fn ml_value_inside_band_is_applied() {
    let baseline = common::reference_engine(UnavailableAdvisor)
        .calculate_all_results(&common::regional_hospital())
        .expect("baseline run");
    let target = baseline.recommended_pv_power_kw * 1.5;

    let engine = common::reference_engine(common::advisor_with(&[(PV_POWER, target)]));
    let r = engine
        .calculate_all_results(&common::regional_hospital())
        .expect("enhanced run");

    assert_eq!(r.recommended_pv_power_kw, target);
    assert_eq!(
        r.recommended_battery_capacity_kwh,
        baseline.recommended_battery_capacity_kwh
    );
    assert!(r.enhancement.is_applied());
    assert!(r.installation_cost.total > baseline.installation_cost.total);
}

#[test]
fn ml_value_outside_band_is_rejected() {
    let baseline = common::reference_engine(UnavailableAdvisor)
        .calculate_all_results(&common::regional_hospital())
        .expect("baseline run");
    let pv = baseline.recommended_pv_power_kw;
    let battery = baseline.recommended_battery_capacity_kwh;

    for (kind, value) in [
        (PV_POWER, 2.0 * pv),
        (PV_POWER, 0.0),
        (PV_POWER, -10.0),
        (BATTERY_CAPACITY, 2.5 * battery),
    ] {
        let engine = common::reference_engine(common::advisor_with(&[(kind, value)]));
        let r = engine
            .calculate_all_results(&common::regional_hospital())
            .expect("enhanced run");
        assert_eq!(r.recommended_pv_power_kw, pv, "{kind}={value} should be rejected");
        assert_eq!(r.recommended_battery_capacity_kwh, battery);
        assert_eq!(r.enhancement, Enhancement::NotApplied);
        assert!(r.enhancement_attempted);
    }
}

#[test]
fn ml_guard_compares_against_updated_value() {
    let baseline = common::reference_engine(UnavailableAdvisor)
        .calculate_all_results(&common::regional_hospital())
        .expect("baseline run");
    let pv = baseline.recommended_pv_power_kw;

    // Second value is above 2× baseline but below 2× the first accepted value.
    let engine = common::reference_engine(common::advisor_with(&[
        (PV_POWER, 1.8 * pv),
        (PV_POWER, 3.0 * pv),
    ]));
    let r = engine
        .calculate_all_results(&common::regional_hospital())
        .expect("enhanced run");
    assert_eq!(r.recommended_pv_power_kw, 3.0 * pv);
    match r.enhancement {
        Enhancement::Applied { adjustments } => assert_eq!(adjustments.len(), 2),
        other => panic!("expected applied enhancement, got {other:?}"),
    }
}

#[test]
fn advisor_failure_keeps_baseline() {
    let baseline = common::reference_engine(UnavailableAdvisor)
        .calculate_all_results(&common::regional_hospital())
        .expect("baseline run");
    let r = common::reference_engine(OfflineAdvisor)
        .calculate_all_results(&common::regional_hospital())
        .expect("advisor failure must not abort");

    assert!(r.enhancement_attempted);
    assert!(matches!(
        &r.enhancement,
        Enhancement::Failed { reason } if reason.contains("503")
    ));
    assert_eq!(r.recommended_pv_power_kw, baseline.recommended_pv_power_kw);
    assert_eq!(r.annual_savings, baseline.annual_savings);
}

#[test]
fn required_collaborator_failures_abort() {
    // No declared roof, so the recommended surface is requested too.
    let facility = Facility {
        installable_surface_m2: None,
        ..common::regional_hospital()
    };
    for (fail_on, stage) in [
        (FailOn::PvPower, "baseline sizing"),
        (FailOn::Battery, "baseline sizing"),
        (FailOn::Surface, "autonomy"),
        (FailOn::Autonomy, "autonomy"),
        (FailOn::Savings, "savings"),
    ] {
        let engine = ResultsEngine::new(
            FailingSizing::new(fail_on),
            ReferenceSizing::default(),
            UnavailableAdvisor,
        )
        .with_observer(RecordingObserver::default());
        let err = engine.calculate_all_results(&facility);
        match err {
            Err(ResultsError::Collaborator { stage: s, source }) => {
                assert_eq!(s, stage, "{fail_on:?}");
                assert_eq!(source.collaborator, Collaborator::Sizing);
            }
            Ok(_) => panic!("{fail_on:?} should abort the run"),
        }
    }
}

#[test]
fn production_is_only_needed_with_existing_pv() {
    let engine = ResultsEngine::new(
        ReferenceSizing::default(),
        FailingProduction,
        UnavailableAdvisor,
    )
    .with_observer(RecordingObserver::default());

    assert!(engine.calculate_all_results(&common::regional_hospital()).is_ok());

    let with_pv = Facility {
        existing_pv_installed: Some(true),
        existing_pv_power_kwc: Some(50.0),
        ..common::regional_hospital()
    };
    let err = engine.calculate_all_results(&with_pv);
    assert!(matches!(
        err,
        Err(ResultsError::Collaborator { stage: "before/after comparison", .. })
    ));
}

#[test]
fn existing_pv_reduces_net_savings() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let facility = Facility {
        existing_pv_installed: Some(true),
        existing_pv_power_kwc: Some(50.0),
        ..Facility::default()
    };
    let r = engine.calculate_all_results(&facility).expect("run");

    // Existing 50 kWc in tier C: 6 600 kWh/month, 13.2% autonomy.
    assert_relative_eq!(r.before_after.before_autonomy_pct, 13.2, max_relative = 1e-12);
    assert_relative_eq!(r.annual_savings, 720_000.0 - 95_040.0, max_relative = 1e-9);
    assert!(r.before_after.has_existing_pv);
    assert_relative_eq!(
        r.before_after.annual_savings_gain,
        r.before_after.monthly_savings_gain * 12.0,
        max_relative = 1e-12
    );
}

#[test]
fn existing_pv_flag_without_power_changes_nothing() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let plain = engine.calculate_all_results(&Facility::default()).expect("run");
    let flagged = engine
        .calculate_all_results(&Facility {
            existing_pv_installed: Some(true),
            ..Facility::default()
        })
        .expect("run");
    assert_eq!(plain.annual_savings, flagged.annual_savings);
    assert_eq!(flagged.before_after.before_autonomy_pct, 0.0);
}

#[test]
fn zero_consumption_has_no_payback_and_unbounded_backup() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let r = engine
        .calculate_all_results(&Facility {
            monthly_consumption_kwh: Some(0.0),
            ..Facility::default()
        })
        .expect("run");
    assert_eq!(r.financial.roi, Payback::Never);
    assert_eq!(r.financial.irr_pct, 0.0);
    assert!(r.resilience.autonomy_hours.is_none());
    assert_eq!(r.global_score.economic_score, 0.0);
}

#[test]
fn repeated_runs_are_identical() {
    let engine = common::reference_engine(common::advisor_with(&[(BATTERY_CAPACITY, 400.0)]));
    let facility = common::regional_hospital();
    let first = engine.calculate_all_results(&facility).expect("run");
    let second = engine.calculate_all_results(&facility).expect("run");
    assert_eq!(first, second);
    assert_eq!(serde_json::to_vec(&first).ok(), serde_json::to_vec(&second).ok());
}

#[test]
fn stages_are_reported_in_order() {
    let observer = RecordingObserver::default();
    let engine = ResultsEngine::new(
        ReferenceSizing::default(),
        ReferenceSizing::default(),
        OfflineAdvisor,
    )
    .with_observer(observer.clone());
    engine
        .calculate_all_results(&common::regional_hospital())
        .expect("run");

    assert_eq!(
        observer.names(),
        ["inputs", "baseline", "enhancement", "autonomy", "savings", "completed"]
    );
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = common::reference_engine(UnavailableAdvisor);
    let facility = common::regional_hospital();
    let expected = engine.calculate_all_results(&facility).expect("run");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| engine.calculate_all_results(&facility)))
            .collect();
        for h in handles {
            let r = h.join().expect("thread should not panic");
            assert_eq!(r.ok().as_ref(), Some(&expected));
        }
    });
}
