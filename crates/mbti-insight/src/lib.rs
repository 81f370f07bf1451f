//! Personality questionnaire scoring service: question catalog, scoring and
//! classification, narrative report generation, and result storage.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
