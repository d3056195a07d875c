//! Error types shared across the engine, classifier, and configuration layers.

use thiserror::Error;

/// Which external collaborator produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Sizing,
    Production,
    Advisor,
    CityLookup,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sizing => "sizing",
            Self::Production => "production",
            Self::Advisor => "advisor",
            Self::CityLookup => "city lookup",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator implementation.
#[derive(Debug, Clone, Error)]
#[error("{collaborator} collaborator failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: Collaborator,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

/// Failure of a full results computation.
///
/// Only required collaborators surface here; advisory failures are absorbed
/// by the pipeline and reported through [`crate::advisor::Enhancement`].
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("results pipeline aborted during {stage}: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: CollaboratorError,
    },
}

impl ResultsError {
    pub(crate) fn at(stage: &'static str) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| Self::Collaborator { stage, source }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"facility.monthly_consumption_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure while loading the city catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read city catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("city catalog row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Failure of a config-driven assessment run.
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(
        "invalid configuration ({} error(s)), first: {}",
        .0.len(),
        .0.first().map(ToString::to_string).unwrap_or_default()
    )]
    Invalid(Vec<ConfigError>),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("location classification failed: {0}")]
    Location(#[source] CollaboratorError),
    #[error(transparent)]
    Results(#[from] ResultsError),
}
