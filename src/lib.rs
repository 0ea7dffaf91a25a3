//! Two-tier chaos demo services.
//!
//! The back tier runs the [`simulator`], which produces slow, failing and
//! resource-hungry responses on demand. The front tier forwards to it through
//! the [`proxy`] and maps downstream failures to client-visible statuses.
//! Every operation on both tiers is timed by the [`metrics`] recorder.

pub mod api;
pub mod config;
pub mod metrics;
pub mod proxy;
pub mod simulator;
pub mod telemetry;
