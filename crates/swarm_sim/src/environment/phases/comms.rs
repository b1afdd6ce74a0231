use super::super::Environment;

impl Environment {
    /// Recompute every agent's link quality against the current leader's
    /// position (or the area center when leaderless).
    pub(in crate::environment) fn step_comms_phase(&mut self) {
        let anchor = self.leader_position();
        for agent in self.agents.iter_mut() {
            self.comms.update_comm_quality(agent, anchor, &mut self.rng);
        }
    }
}
