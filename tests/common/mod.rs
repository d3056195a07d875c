//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use microgrid_results::advisor::{MlAdvisor, MlRecommendation, StaticAdvisor};
use microgrid_results::error::{Collaborator, CollaboratorError};
use microgrid_results::facility::{EstablishmentType, Facility, IrradiationTier};
use microgrid_results::results::ResultsEngine;
use microgrid_results::sizing::{ProductionModel, ReferenceSizing, SizingModel};
use microgrid_results::telemetry::{Stage, StageObserver};

/// Mid-size regional hospital with a declared roof and no existing PV.
pub fn regional_hospital() -> Facility {
    Facility {
        name: "Hopital regional".to_string(),
        establishment_type: EstablishmentType::RegionalHospital,
        monthly_consumption_kwh: Some(50_000.0),
        installable_surface_m2: Some(1_000.0),
        irradiation_tier: Some(IrradiationTier::B),
        number_of_beds: Some(300),
        ..Facility::default()
    }
}

/// Engine over the reference model with the given advisor, logging nothing.
pub fn reference_engine<M: MlAdvisor>(
    advisor: M,
) -> ResultsEngine<ReferenceSizing, ReferenceSizing, M> {
    ResultsEngine::new(ReferenceSizing::default(), ReferenceSizing::default(), advisor)
        .with_observer(RecordingObserver::default())
}

/// Advisor answering with the given `(type, value)` pairs.
pub fn advisor_with(recs: &[(&str, f64)]) -> StaticAdvisor {
    StaticAdvisor::new(
        recs.iter()
            .map(|(kind, value)| MlRecommendation::numeric(kind, *value))
            .collect(),
    )
}

/// Which sizing operation [`FailingSizing`] fails on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    PvPower,
    Battery,
    Autonomy,
    Surface,
    Savings,
}

/// Reference sizing that fails on one operation.
pub struct FailingSizing {
    pub inner: ReferenceSizing,
    pub fail_on: FailOn,
}

impl FailingSizing {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: ReferenceSizing::default(),
            fail_on,
        }
    }

    fn check(&self, op: FailOn) -> Result<(), CollaboratorError> {
        if self.fail_on == op {
            Err(CollaboratorError::new(Collaborator::Sizing, "sizing service timed out"))
        } else {
            Ok(())
        }
    }
}

impl SizingModel for FailingSizing {
    fn recommended_pv_power(&self, c: f64, t: IrradiationTier) -> Result<f64, CollaboratorError> {
        self.check(FailOn::PvPower)?;
        self.inner.recommended_pv_power(c, t)
    }

    fn recommended_battery_capacity(&self, c: f64) -> Result<f64, CollaboratorError> {
        self.check(FailOn::Battery)?;
        self.inner.recommended_battery_capacity(c)
    }

    fn energy_autonomy(
        &self,
        s: f64,
        c: f64,
        t: IrradiationTier,
    ) -> Result<f64, CollaboratorError> {
        self.check(FailOn::Autonomy)?;
        self.inner.energy_autonomy(s, c, t)
    }

    fn recommended_pv_surface(&self, c: f64, t: IrradiationTier) -> Result<f64, CollaboratorError> {
        self.check(FailOn::Surface)?;
        self.inner.recommended_pv_surface(c, t)
    }

    fn annual_savings(&self, c: f64, a: f64, tariff: f64) -> Result<f64, CollaboratorError> {
        self.check(FailOn::Savings)?;
        self.inner.annual_savings(c, a, tariff)
    }
}

/// Production model that is always down.
pub struct FailingProduction;

impl ProductionModel for FailingProduction {
    fn pv_production_for_period(
        &self,
        _: f64,
        _: IrradiationTier,
        _: u32,
    ) -> Result<f64, CollaboratorError> {
        Err(CollaboratorError::new(Collaborator::Production, "yield service offline"))
    }
}

/// Advisor that is always down.
pub struct OfflineAdvisor;

impl MlAdvisor for OfflineAdvisor {
    fn recommendations(&self, _: &Facility) -> Result<Vec<MlRecommendation>, CollaboratorError> {
        Err(CollaboratorError::new(Collaborator::Advisor, "model endpoint returned 503"))
    }
}

/// Observer keeping the name of every stage it sees.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub stages: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingObserver {
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl StageObserver for RecordingObserver {
    fn on_stage(&self, stage: &Stage<'_>) {
        if let Ok(mut stages) = self.stages.lock() {
            stages.push(stage.name());
        }
    }
}
