use log::debug;
use rand::Rng;

use super::super::Environment;

impl Environment {
    /// Move every live agent (random walk or homing on the area center),
    /// then drain its battery. Dead agents are skipped outright.
    pub(in crate::environment) fn step_mobility_phase(&mut self) {
        let config = &self.config;
        let center = config.area.center();
        let rng = &mut self.rng;

        for agent in self.agents.iter_mut() {
            if !agent.is_alive() {
                continue;
            }
            if rng.gen::<f64>() < config.random_walk_prob {
                agent.random_walk(&config.area, config.move_step, rng);
            } else {
                agent.move_toward(center, config.move_step);
            }
            let amount = config.battery_drain.sample(rng);
            if agent.drain_battery(amount) {
                debug!("agent {} exhausted its battery", agent.id());
            }
        }
    }
}
