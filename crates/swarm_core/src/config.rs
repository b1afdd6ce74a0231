//! Simulation parameters.
//!
//! Every field has a default, so a TOML document only needs the keys it
//! overrides. [`SimConfig::validate`] rejects parameter sets that would make
//! a run meaningless before any tick executes.

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comms::{CommsModel, DEFAULT_ATTENUATION};
use crate::election::{ElectionModel, ElectionWeights};
use crate::geometry::{Bounds, Position};
use crate::reputation::ReputationModel;

/// Weight sums further than this from 1.0 are logged, not rejected.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("swarm must contain at least one agent")]
    NoAgents,
    #[error("area dimensions must be positive and finite, got {width} x {height}")]
    InvalidArea { width: f64, height: f64 },
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("election weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },
    #[error("{name} range [{low}, {high}) is invalid")]
    InvalidRange {
        name: &'static str,
        low: f64,
        high: f64,
    },
    #[error("reputation priors must be at least 1, got ({success}, {failure})")]
    InvalidPrior { success: u32, failure: u32 },
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Half-open interval `[low, high)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRange {
    pub low: f64,
    pub high: f64,
}

impl UnitRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.low + rng.gen::<f64>() * (self.high - self.low)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        let ordered = self.low.is_finite() && self.high.is_finite() && self.low <= self.high;
        if !ordered || self.low < 0.0 || self.high > 1.0 {
            return Err(ConfigError::InvalidRange {
                name,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    pub weights: ElectionWeights,
    /// Minimum reputation to stand for election
    pub rep_threshold: f64,
    /// Upper bound of the tie-breaking score jitter (eps_max)
    pub score_jitter: f64,
    /// Scoring reference point; the area center when unset
    pub reference_point: Option<Position>,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            weights: ElectionWeights::default(),
            rep_threshold: 0.25,
            score_jitter: 0.01,
            reference_point: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    pub prior_success: u32,
    pub prior_failure: u32,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            prior_success: 1,
            prior_failure: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub n_agents: usize,
    pub area: Bounds,
    pub seed: u64,
    /// Per-tick probability that a live agent is forcibly failed
    pub failure_prob: f64,
    /// Swarm size above which low-priority traffic congests
    pub low_priority_cutoff: usize,
    /// Extra low-priority drop probability per agent above the cutoff
    pub congestion_gamma: f64,
    /// Distance decay factor for comm quality
    pub attenuation_gamma: f64,
    /// Distance covered per tick
    pub move_step: f64,
    /// Probability of a random walk instead of homing on the center
    pub random_walk_prob: f64,
    /// Per-tick battery drain
    pub battery_drain: UnitRange,
    /// Battery level agents start a run with
    pub initial_battery: UnitRange,
    pub election: ElectionConfig,
    pub reputation: ReputationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_agents: 8,
            area: Bounds::default(),
            seed: 42,
            failure_prob: 0.02,
            low_priority_cutoff: 20,
            congestion_gamma: 0.02,
            attenuation_gamma: DEFAULT_ATTENUATION,
            move_step: 0.8,
            random_walk_prob: 0.6,
            battery_drain: UnitRange::new(0.005, 0.015),
            initial_battery: UnitRange::new(0.6, 1.0),
            election: ElectionConfig::default(),
            reputation: ReputationConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        let area_ok = self.area.width.is_finite()
            && self.area.height.is_finite()
            && self.area.width > 0.0
            && self.area.height > 0.0;
        if !area_ok {
            return Err(ConfigError::InvalidArea {
                width: self.area.width,
                height: self.area.height,
            });
        }

        check_probability("failure_prob", self.failure_prob)?;
        check_probability("random_walk_prob", self.random_walk_prob)?;
        check_probability("election.rep_threshold", self.election.rep_threshold)?;

        check_non_negative("congestion_gamma", self.congestion_gamma)?;
        check_non_negative("attenuation_gamma", self.attenuation_gamma)?;
        check_non_negative("move_step", self.move_step)?;
        check_non_negative("election.score_jitter", self.election.score_jitter)?;

        self.battery_drain.check("battery_drain")?;
        self.initial_battery.check("initial_battery")?;
        if self.initial_battery.low <= 0.0 {
            // Agents must start alive, and an empty battery means dead.
            return Err(ConfigError::InvalidRange {
                name: "initial_battery",
                low: self.initial_battery.low,
                high: self.initial_battery.high,
            });
        }

        let w = &self.election.weights;
        for (name, value) in [
            ("battery", w.battery),
            ("distance", w.distance),
            ("comm", w.comm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        if (w.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!("election weights sum to {:.4}, expected 1.0", w.sum());
        }

        let priors = &self.reputation;
        if priors.prior_success == 0 || priors.prior_failure == 0 {
            return Err(ConfigError::InvalidPrior {
                success: priors.prior_success,
                failure: priors.prior_failure,
            });
        }
        Ok(())
    }

    pub fn reference_point(&self) -> Position {
        self.election
            .reference_point
            .unwrap_or_else(|| self.area.center())
    }

    pub fn election_model(&self) -> ElectionModel {
        ElectionModel::new(
            self.election.weights,
            self.election.rep_threshold,
            self.reference_point(),
            self.election.score_jitter,
        )
    }

    pub fn comms_model(&self) -> CommsModel {
        CommsModel::new(self.area, self.attenuation_gamma)
    }

    pub fn reputation_model(&self) -> ReputationModel {
        ReputationModel::new(self.reputation.prior_success, self.reputation.prior_failure)
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NegativeParameter { name, value });
    }
    Ok(())
}
