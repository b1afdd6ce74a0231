use std::collections::BTreeSet;

use log::debug;
use swarm_core::AgentId;

use super::super::Environment;

impl Environment {
    /// Re-elect from scratch, penalizing agents missing from `available`.
    /// A change only counts when a new, non-empty result differs from the
    /// previous leader.
    pub(in crate::environment) fn step_election_phase(
        &mut self,
        available: &BTreeSet<AgentId>,
    ) -> Option<AgentId> {
        let previous = self.leader_id();
        let elected = self
            .election
            .elect(&self.agents, Some(available), &mut self.rng);

        if elected.is_some() && elected != previous {
            self.metrics.leader_changes += 1;
            debug!("leader change: {:?} -> {:?}", previous, elected);
        }
        self.apply_leader(elected);
        elected
    }
}
