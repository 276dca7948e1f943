//! Placement automation engine: drive eligibility, weighted ranking, and offer policy.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
