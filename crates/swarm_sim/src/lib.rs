//! Swarm Sim: the tick-driven engine that advances every swarm model in a
//! fixed order and records an append-only trace.
//!
//! ```text
//! mobility + drain -> comms refresh -> broadcast -> election -> failures -> trace
//! ```
//!
//! The engine is single-threaded and owns the only RNG; a fixed
//! [`swarm_core::SimConfig`] (seed included) always reproduces the same trace.

pub mod environment;
pub mod metrics;
pub mod trace;

pub use environment::Environment;
pub use metrics::SwarmMetrics;
pub use trace::{RunSummary, TraceCell, TraceRecord};
