//! Workflow core for the campus placement portal.
//!
//! The crate owns the application lifecycle state machine, eligibility
//! gating, and the append-only timeline, plus the configuration and
//! telemetry plumbing shared with the API binary. Persistence and
//! notification delivery stay behind traits so callers can wire real
//! adapters or the in-memory ones used by the service binary and tests.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
