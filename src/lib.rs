//! Solar-plus-battery microgrid sizing and results engine for healthcare facilities.

pub mod advisor;
pub mod cli;
pub mod config;
pub mod error;
/// Facility inputs and the canonical irradiation tier.
pub mod facility;
pub mod io;
/// Irradiation tier and population classification from coordinates.
pub mod location;
/// Aggregate results pipeline and its sub-calculators.
pub mod results;
pub mod runner;
/// Sizing and production collaborators.
pub mod sizing;
pub mod telemetry;
