//! Leader Election Model
//!
//! Stateless, re-run from scratch every tick (no incumbency bonus, no terms):
//! 1. Candidates are alive agents with `reputation >= rep_threshold`
//! 2. Each candidate is scored via [`Agent::compute_score`]
//! 3. Candidates missing from the `available` set (agents that did not get a
//!    broadcast through this tick) have their score scaled by
//!    [`ABSENT_PENALTY`]
//! 4. The highest score wins; on exact ties the first candidate in agent
//!    order wins
//!
//! An empty candidate set yields `None`. That is a normal outcome, not an
//! error.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::agent::{Agent, AgentId};
use crate::geometry::Position;

/// Score multiplier for candidates that failed to broadcast this tick
pub const ABSENT_PENALTY: f64 = 0.8;

/// Weight triple for the leader fitness score. Conventionally sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectionWeights {
    pub battery: f64,
    pub distance: f64,
    pub comm: f64,
}

impl ElectionWeights {
    pub fn new(battery: f64, distance: f64, comm: f64) -> Self {
        Self {
            battery,
            distance,
            comm,
        }
    }

    pub fn sum(&self) -> f64 {
        self.battery + self.distance + self.comm
    }
}

impl Default for ElectionWeights {
    fn default() -> Self {
        Self::new(0.4, 0.3, 0.3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectionModel {
    weights: ElectionWeights,
    rep_threshold: f64,
    reference_point: Position,
    /// Upper bound of the tie-breaking jitter added to every score
    jitter: f64,
}

impl ElectionModel {
    pub fn new(
        weights: ElectionWeights,
        rep_threshold: f64,
        reference_point: Position,
        jitter: f64,
    ) -> Self {
        Self {
            weights,
            rep_threshold,
            reference_point,
            jitter,
        }
    }

    pub fn weights(&self) -> &ElectionWeights {
        &self.weights
    }

    pub fn rep_threshold(&self) -> f64 {
        self.rep_threshold
    }

    pub fn reference_point(&self) -> Position {
        self.reference_point
    }

    pub fn is_eligible(&self, agent: &Agent) -> bool {
        agent.is_alive() && agent.reputation() >= self.rep_threshold
    }

    /// Post-penalty scores for every eligible agent, in agent order.
    ///
    /// Draws one jitter sample per eligible agent, so the RNG stream advances
    /// identically whether the caller goes on to pick a winner or not.
    pub fn score_candidates<R: Rng + ?Sized>(
        &self,
        agents: &[Agent],
        available: Option<&BTreeSet<AgentId>>,
        rng: &mut R,
    ) -> Vec<(AgentId, f64)> {
        agents
            .iter()
            .filter(|a| self.is_eligible(a))
            .map(|a| {
                let mut score =
                    a.compute_score(self.reference_point, &self.weights, self.jitter, rng);
                if let Some(available) = available {
                    if !available.contains(&a.id()) {
                        score *= ABSENT_PENALTY;
                    }
                }
                (a.id(), score)
            })
            .collect()
    }

    /// Elect a leader, or `None` if nobody is eligible.
    pub fn elect<R: Rng + ?Sized>(
        &self,
        agents: &[Agent],
        available: Option<&BTreeSet<AgentId>>,
        rng: &mut R,
    ) -> Option<AgentId> {
        select_first_max(&self.score_candidates(agents, available, rng))
    }
}

/// First-max-wins selection: a later candidate replaces the incumbent only
/// with a strictly greater score.
fn select_first_max(scored: &[(AgentId, f64)]) -> Option<AgentId> {
    let mut best: Option<(AgentId, f64)> = None;
    for &(id, score) in scored {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((id, score)),
        }
    }
    best.map(|(id, _)| id)
}
