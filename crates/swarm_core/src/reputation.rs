//! Bayesian Reputation Model
//!
//! Turns observed events into Beta pseudo-counts stored on each agent.
//! Reputation is the posterior mean `success / (success + failure)`:
//! - Agents start at the configured prior (default Beta(1,1), i.e. 0.5)
//! - A delivered broadcast is positive evidence
//! - A dropped broadcast is negative evidence
//! - An injected failure is additional negative evidence
//!
//! A drop caused purely by channel noise is indistinguishable from an
//! unreliable agent here. Delivery outcome is the swarm's only trust signal,
//! so both are scored the same way.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// Default positive pseudo-count (uniform prior)
const DEFAULT_PRIOR_SUCCESS: u32 = 1;

/// Default negative pseudo-count (uniform prior)
const DEFAULT_PRIOR_FAILURE: u32 = 1;

/// Counter bookkeeping over agent state. Holds nothing but its priors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationModel {
    prior_success: u32,
    prior_failure: u32,
}

impl Default for ReputationModel {
    fn default() -> Self {
        Self::new(DEFAULT_PRIOR_SUCCESS, DEFAULT_PRIOR_FAILURE)
    }
}

impl ReputationModel {
    /// Priors below 1 are raised to 1 so the posterior mean stays defined.
    pub fn new(prior_success: u32, prior_failure: u32) -> Self {
        Self {
            prior_success: prior_success.max(1),
            prior_failure: prior_failure.max(1),
        }
    }

    pub fn priors(&self) -> (u32, u32) {
        (self.prior_success, self.prior_failure)
    }

    /// Reset an agent's counters to the prior.
    pub fn initialize(&self, agent: &mut Agent) {
        agent.set_reputation_counts(self.prior_success, self.prior_failure);
    }

    /// A delivered message counts as success, a drop as failure.
    pub fn update_from_send(&self, agent: &mut Agent, sent: bool) {
        agent.bayesian_update(sent);
    }

    /// Explicit negative evidence for a forcibly failed agent.
    pub fn update_for_failure(&self, agent: &mut Agent) {
        agent.bayesian_update(false);
    }
}
