//! Agent State
//!
//! The mutable record for one swarm member plus its self-contained
//! transitions: mobility, battery drain, leader scoring, Bayesian counter
//! updates and lossy send attempts.
//!
//! Liveness is one-way. Once an agent dies (battery exhausted or failure
//! injected) it never moves, never sends, never holds leadership and its comm
//! quality stays pinned at zero.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::election::ElectionWeights;
use crate::geometry::{Bounds, Position};

/// Stable agent identifier; also the agent's index in the engine's store.
pub type AgentId = usize;

/// Below this distance `move_toward` treats the agent as already arrived.
const ARRIVAL_EPSILON: f64 = 1e-6;

/// Congested low-priority traffic never drops more often than this.
const MAX_CONGESTION_DROP: f64 = 0.95;

/// Drop probability as soon as the swarm exceeds the low-priority cutoff.
const BASE_CONGESTION_DROP: f64 = 0.5;

/// Message priority for a broadcast attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Background traffic, shed first under congestion.
    Low,
    #[default]
    Normal,
}

/// Result of one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendOutcome {
    Sent,
    Dropped,
}

impl SendOutcome {
    pub fn is_sent(self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

/// Drop probability from congestion alone, or `None` when the congestion
/// term does not apply (normal priority, or swarm at/below the cutoff).
///
/// `min(0.95, 0.5 + (swarm_size - cutoff) * gamma)`
pub fn congestion_drop_probability(
    priority: Priority,
    swarm_size: usize,
    low_cutoff: usize,
    gamma: f64,
) -> Option<f64> {
    if priority != Priority::Low || swarm_size <= low_cutoff {
        return None;
    }
    let excess = (swarm_size - low_cutoff) as f64;
    Some((BASE_CONGESTION_DROP + excess * gamma).min(MAX_CONGESTION_DROP))
}

/// One swarm member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    position: Position,
    /// Remaining charge in [0, 1]
    battery: f64,
    /// Link quality computed on the latest tick, [0, 1]
    comm_quality: f64,
    /// Beta pseudo-count of positive evidence (never below the prior)
    rep_success: u32,
    /// Beta pseudo-count of negative evidence (never below the prior)
    rep_failure: u32,
    is_leader: bool,
    alive: bool,
    msgs_sent: u64,
    msgs_dropped: u64,
}

impl Agent {
    /// Fresh agent with a uniform Beta(1,1) reputation prior. An agent
    /// created with an empty battery starts dead.
    pub fn new(id: AgentId, position: Position, battery: f64) -> Self {
        let mut agent = Self {
            id,
            position,
            battery: battery.clamp(0.0, 1.0),
            comm_quality: 1.0,
            rep_success: 1,
            rep_failure: 1,
            is_leader: false,
            alive: true,
            msgs_sent: 0,
            msgs_dropped: 0,
        };
        if agent.battery <= 0.0 {
            agent.kill();
        }
        agent
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn comm_quality(&self) -> f64 {
        self.comm_quality
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    pub fn msgs_sent(&self) -> u64 {
        self.msgs_sent
    }

    pub fn msgs_dropped(&self) -> u64 {
        self.msgs_dropped
    }

    /// `(success, failure)` pseudo-counts.
    pub fn reputation_counts(&self) -> (u32, u32) {
        (self.rep_success, self.rep_failure)
    }

    /// Beta posterior mean `success / (success + failure)`.
    ///
    /// Both counters start at >= 1 and only grow, so the result lies strictly
    /// inside (0, 1).
    pub fn reputation(&self) -> f64 {
        let s = self.rep_success as f64;
        let f = self.rep_failure as f64;
        s / (s + f)
    }

    /// Flag or unflag leadership. A dead agent can never be flagged.
    pub fn set_leader(&mut self, leader: bool) {
        self.is_leader = leader && self.alive;
    }

    /// Overwrite the link quality, clamped to [0, 1]. Dead agents stay at 0.
    pub fn set_comm_quality(&mut self, quality: f64) {
        self.comm_quality = if self.alive {
            quality.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Reset the reputation counters. Counters are floored at 1 so the
    /// posterior mean is always defined.
    pub(crate) fn set_reputation_counts(&mut self, success: u32, failure: u32) {
        self.rep_success = success.max(1);
        self.rep_failure = failure.max(1);
    }

    /// Terminal transition: dead, drained, silent and stripped of leadership.
    pub fn kill(&mut self) {
        self.alive = false;
        self.battery = 0.0;
        self.comm_quality = 0.0;
        self.is_leader = false;
    }

    /// Step `step` along a uniform-random heading, clamped into `bounds`.
    pub fn random_walk<R: Rng + ?Sized>(&mut self, bounds: &Bounds, step: f64, rng: &mut R) {
        if !self.alive {
            return;
        }
        let heading = rng.gen::<f64>() * TAU;
        let next = Position::new(
            self.position.x + heading.cos() * step,
            self.position.y + heading.sin() * step,
        );
        self.position = bounds.clamp(next);
    }

    /// Advance at most `step` along the straight line to `goal`.
    pub fn move_toward(&mut self, goal: Position, step: f64) {
        if !self.alive {
            return;
        }
        let dx = goal.x - self.position.x;
        let dy = goal.y - self.position.y;
        let dist = dx.hypot(dy);
        if dist < ARRIVAL_EPSILON {
            return;
        }
        let advance = step.min(dist);
        self.position = Position::new(
            self.position.x + dx / dist * advance,
            self.position.y + dy / dist * advance,
        );
    }

    /// Subtract `amount` from the battery. Returns `true` if this drain
    /// exhausted the battery and killed the agent.
    pub fn drain_battery(&mut self, amount: f64) -> bool {
        if !self.alive {
            return false;
        }
        self.battery -= amount;
        if self.battery <= 0.0 {
            self.kill();
            return true;
        }
        false
    }

    /// Leader fitness:
    /// `w_b*battery + w_d/(1 + dist(reference)) + w_c*comm + U[0, eps_max)`.
    ///
    /// The jitter breaks exact ties between otherwise equal candidates. It is
    /// drawn from the caller's RNG, so a fixed seed reproduces the same jitter
    /// sequence. Dead agents score `-inf` without consuming randomness.
    pub fn compute_score<R: Rng + ?Sized>(
        &self,
        reference: Position,
        weights: &ElectionWeights,
        eps_max: f64,
        rng: &mut R,
    ) -> f64 {
        if !self.alive {
            return f64::NEG_INFINITY;
        }
        let dist_score = 1.0 / (1.0 + self.position.distance_to(reference));
        let jitter = rng.gen::<f64>() * eps_max;
        weights.battery * self.battery
            + weights.distance * dist_score
            + weights.comm * self.comm_quality
            + jitter
    }

    /// Record one observation as Beta evidence. Counters never decrease.
    pub fn bayesian_update(&mut self, success: bool) {
        if success {
            self.rep_success = self.rep_success.saturating_add(1);
        } else {
            self.rep_failure = self.rep_failure.saturating_add(1);
        }
    }

    /// Try to get one message through the channel.
    ///
    /// Dead agents drop without touching the RNG. Low-priority traffic in an
    /// oversized swarm first survives a congestion check, then every message
    /// succeeds with probability exactly `comm_quality`: a draw `u ~ U[0, 1)`
    /// gets through when `u < comm_quality`, so a zero-quality link never
    /// delivers.
    pub fn attempt_send<R: Rng + ?Sized>(
        &mut self,
        priority: Priority,
        swarm_size: usize,
        low_cutoff: usize,
        gamma: f64,
        rng: &mut R,
    ) -> SendOutcome {
        if !self.alive {
            self.msgs_dropped += 1;
            return SendOutcome::Dropped;
        }
        if let Some(drop_prob) = congestion_drop_probability(priority, swarm_size, low_cutoff, gamma)
        {
            if rng.gen::<f64>() < drop_prob {
                self.msgs_dropped += 1;
                return SendOutcome::Dropped;
            }
        }
        if rng.gen::<f64>() < self.comm_quality {
            self.msgs_sent += 1;
            SendOutcome::Sent
        } else {
            self.msgs_dropped += 1;
            SendOutcome::Dropped
        }
    }

    /// Trace view of this agent.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            battery: self.battery,
            reputation: self.reputation(),
            alive: self.alive,
        }
    }

    /// Rounded status record for dashboards.
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            id: self.id,
            position: Position::new(round_to(self.position.x, 3), round_to(self.position.y, 3)),
            battery: round_to(self.battery, 4),
            comm_quality: round_to(self.comm_quality, 4),
            reputation: round_to(self.reputation(), 4),
            alive: self.alive,
            is_leader: self.is_leader,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Per-agent slice of a trace record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Position,
    pub battery: f64,
    pub reputation: f64,
    pub alive: bool,
}

/// Human-facing status summary, values rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub id: AgentId,
    pub position: Position,
    pub battery: f64,
    pub comm_quality: f64,
    pub reputation: f64,
    pub alive: bool,
    pub is_leader: bool,
}
