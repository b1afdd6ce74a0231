//! Swarm Core: per-agent state and the stochastic models driven by the
//! simulation engine.
//!
//! Every model is a pure transform over one [`agent::Agent`] (or a slice of
//! them) plus by-value configuration. Randomness is never ambient: callers
//! thread an explicit RNG handle (see [`rng`]) into each call so that a fixed
//! seed reproduces an identical draw sequence.

pub mod agent;
pub mod comms;
pub mod config;
pub mod election;
pub mod geometry;
pub mod reputation;
pub mod rng;

pub use agent::{Agent, AgentId, AgentSnapshot, AgentStatus, Priority, SendOutcome};
pub use comms::CommsModel;
pub use config::{ConfigError, ElectionConfig, ReputationConfig, SimConfig, UnitRange};
pub use election::{ElectionModel, ElectionWeights, ABSENT_PENALTY};
pub use geometry::{Bounds, Position};
pub use reputation::ReputationModel;
pub use rng::{create_rng, SimRng};
