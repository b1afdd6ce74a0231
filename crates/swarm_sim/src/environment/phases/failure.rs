use log::debug;
use rand::Rng;

use super::super::Environment;

impl Environment {
    /// Independently of battery state, fail each live agent with probability
    /// `failure_prob`. A failed agent is drained, loses leadership and takes
    /// an extra reputation penalty.
    pub(in crate::environment) fn step_failure_phase(&mut self) {
        let failure_prob = self.config.failure_prob;
        for agent in self.agents.iter_mut() {
            if agent.is_alive() && self.rng.gen::<f64>() < failure_prob {
                agent.kill();
                self.reputation.update_for_failure(agent);
                debug!("agent {} failed", agent.id());
            }
        }
    }
}
