use std::collections::BTreeSet;

use swarm_core::{AgentId, Priority};

use super::super::Environment;

impl Environment {
    /// Every agent, dead or alive, attempts a normal-priority status
    /// broadcast. Returns the ids whose message got through.
    pub(in crate::environment) fn step_broadcast_phase(&mut self) -> BTreeSet<AgentId> {
        let swarm_size = self.agents.len();
        let cutoff = self.config.low_priority_cutoff;
        let gamma = self.config.congestion_gamma;

        let mut available = BTreeSet::new();
        for agent in self.agents.iter_mut() {
            let sent = agent
                .attempt_send(Priority::Normal, swarm_size, cutoff, gamma, &mut self.rng)
                .is_sent();
            self.metrics.record_send(sent);
            self.reputation.update_from_send(agent, sent);
            if sent {
                available.insert(agent.id());
            }
        }
        available
    }
}
