//! Simulation Engine
//!
//! [`Environment`] owns the agent store (a `Vec` indexed by agent id), the
//! run's RNG and the cumulative metrics. Each tick runs the phases below to
//! completion, in order, because every phase consumes the full output of the
//! one before it:
//!
//! 1. mobility + battery drain (alive agents only)
//! 2. comms refresh, anchored on the leader elected last tick
//! 3. broadcast attempts; outcomes feed metrics and reputation
//! 4. election, penalizing agents whose broadcast did not get through
//! 5. failure injection
//! 6. trace append

mod phases;

use log::{debug, info};
use rand::Rng;
use swarm_core::{
    create_rng, Agent, AgentId, AgentSnapshot, AgentStatus, CommsModel, ConfigError,
    ElectionModel, Position, ReputationModel, SimConfig, SimRng,
};

use crate::metrics::SwarmMetrics;
use crate::trace::TraceRecord;

pub struct Environment {
    config: SimConfig,
    agents: Vec<Agent>,
    rng: SimRng,
    election: ElectionModel,
    comms: CommsModel,
    reputation: ReputationModel,
    metrics: SwarmMetrics,
    trace: Vec<TraceRecord>,
    /// Index of the tick most recently executed
    time: u64,
}

impl Environment {
    /// Validate `config`, seed the RNG and place a fresh swarm with an
    /// initial leader.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut env = Self {
            election: config.election_model(),
            comms: config.comms_model(),
            reputation: config.reputation_model(),
            rng: create_rng(config.seed),
            agents: Vec::with_capacity(config.n_agents),
            metrics: SwarmMetrics::default(),
            trace: Vec::new(),
            time: 0,
            config,
        };
        env.init_agents();
        Ok(env)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn metrics(&self) -> &SwarmMetrics {
        &self.metrics
    }

    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    /// Id of the agent currently flagged leader.
    pub fn leader_id(&self) -> Option<AgentId> {
        self.agents.iter().find(|a| a.is_leader()).map(Agent::id)
    }

    fn leader_position(&self) -> Option<Position> {
        self.agents
            .iter()
            .find(|a| a.is_leader())
            .map(Agent::position)
    }

    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.agents.iter().map(Agent::status).collect()
    }

    /// Scatter agents uniformly over the area with fresh batteries and
    /// priors, then hold an initial election (no broadcast penalty).
    fn init_agents(&mut self) {
        let area = self.config.area;
        let mut agents = Vec::with_capacity(self.config.n_agents);
        for id in 0..self.config.n_agents {
            let x = self.rng.gen::<f64>() * area.width;
            let y = self.rng.gen::<f64>() * area.height;
            let battery = self.config.initial_battery.sample(&mut self.rng);
            let mut agent = Agent::new(id, Position::new(x, y), battery);
            self.reputation.initialize(&mut agent);
            agents.push(agent);
        }
        self.agents = agents;

        let leader = self.election.elect(&self.agents, None, &mut self.rng);
        self.apply_leader(leader);
        debug!("initial leader: {:?}", leader);
    }

    fn apply_leader(&mut self, leader: Option<AgentId>) {
        for agent in self.agents.iter_mut() {
            agent.set_leader(Some(agent.id()) == leader);
        }
    }

    /// Advance exactly one tick and return the newly elected leader.
    pub fn step(&mut self, tick: u64) -> Option<AgentId> {
        self.time = tick;

        self.step_mobility_phase();
        self.step_comms_phase();
        let available = self.step_broadcast_phase();
        let leader = self.step_election_phase(&available);
        self.step_failure_phase();

        let record = TraceRecord::new(tick, leader, &self.metrics, self.snapshot());
        self.trace.push(record);

        debug!(
            "tick {}: leader {:?}, {}/{} broadcasts delivered",
            tick,
            leader,
            available.len(),
            self.agents.len()
        );
        leader
    }

    /// Reset everything (RNG reseeded from the config), then run `steps`
    /// ticks and return the full trace.
    pub fn run(&mut self, steps: u64) -> &[TraceRecord] {
        info!(
            "starting run: {} agents, {} steps, seed {}",
            self.config.n_agents, steps, self.config.seed
        );
        self.trace.clear();
        self.metrics = SwarmMetrics::default();
        self.rng = create_rng(self.config.seed);
        self.time = 0;
        self.init_agents();

        for tick in 0..steps {
            self.step(tick);
        }

        info!(
            "run complete: {} leader changes, {} sent, {} dropped, {} agents alive",
            self.metrics.leader_changes,
            self.metrics.messages_sent,
            self.metrics.messages_dropped,
            self.agents.iter().filter(|a| a.is_alive()).count()
        );
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SimConfig {
        SimConfig {
            seed,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = SimConfig {
            n_agents: 0,
            ..SimConfig::default()
        };
        assert!(matches!(Environment::new(bad), Err(ConfigError::NoAgents)));
    }

    #[test]
    fn test_initial_swarm() {
        let env = Environment::new(config(42)).unwrap();
        assert_eq!(env.agents().len(), 8);
        for (idx, agent) in env.agents().iter().enumerate() {
            assert_eq!(agent.id(), idx);
            assert!(env.config().area.contains(agent.position()));
            assert!((0.6..1.0).contains(&agent.battery()));
            assert_eq!(agent.reputation_counts(), (1, 1));
        }
        // Everyone starts at reputation 0.5 >= 0.25, so somebody leads
        assert!(env.leader_id().is_some());
        assert!(env.trace().is_empty());
    }

    #[test]
    fn test_step_appends_one_record() {
        let mut env = Environment::new(config(1)).unwrap();
        let leader = env.step(0);
        assert_eq!(env.trace().len(), 1);
        assert_eq!(env.trace()[0].leader, leader);
        assert_eq!(env.leader_id(), leader.filter(|id| env.agents()[*id].is_alive()));
        assert_eq!(env.metrics().total_attempts(), 8);
        assert_eq!(env.time(), 0);
    }

    #[test]
    fn test_run_resets_state() {
        let mut env = Environment::new(config(3)).unwrap();
        for tick in 0..5 {
            env.step(tick);
        }
        let trace = env.run(10).to_vec();
        assert_eq!(trace.len(), 10);
        assert_eq!(trace[0].step, 0);
        assert_eq!(env.metrics().total_attempts(), 80);
        assert_eq!(trace[9].messages_sent, env.metrics().messages_sent);
    }

    #[test]
    fn test_statuses_cover_every_agent() {
        let env = Environment::new(config(5)).unwrap();
        let statuses = env.statuses();
        assert_eq!(statuses.len(), 8);
        assert_eq!(statuses.iter().filter(|s| s.is_leader).count(), 1);
    }

    #[test]
    fn test_failure_injection_penalizes_reputation() {
        let config = SimConfig {
            failure_prob: 1.0,
            ..config(4)
        };
        let mut env = Environment::new(config).unwrap();
        let elected = env.step(0);

        // Election ran before the failures, so someone won, then everybody died
        assert!(elected.is_some());
        assert_eq!(env.leader_id(), None);
        for agent in env.agents() {
            assert!(!agent.is_alive());
            assert_eq!(agent.battery(), 0.0);
            let (success, failure) = agent.reputation_counts();
            assert_eq!(success as u64, 1 + agent.msgs_sent());
            assert_eq!(
                failure as u64,
                1 + agent.msgs_dropped() + 1,
                "agent {} missed the failure penalty",
                agent.id()
            );
        }
        assert_eq!(env.trace()[0].alive_count(), 0);
    }

    #[test]
    fn test_comms_anchor_on_current_leader() {
        let config = SimConfig {
            n_agents: 2,
            ..config(8)
        };
        let gamma = config.attenuation_gamma;
        let center = config.area.center();
        let mut env = Environment::new(config).unwrap();

        env.agents = vec![
            Agent::new(0, Position::new(0.0, 0.0), 1.0),
            Agent::new(1, Position::new(3.0, 4.0), 1.0),
        ];
        env.agents[0].set_leader(true);
        env.step_comms_phase();

        // 5 units from the leader, ~16.3 from the center
        let near_leader = (-gamma * 5.0).exp();
        let q = env.agents[1].comm_quality();
        assert!(
            q >= 0.9 * near_leader && q <= 1.1 * near_leader,
            "comm quality {q} not anchored on the leader"
        );
        assert!(env.agents[0].comm_quality() >= 0.9);

        env.agents[0].set_leader(false);
        env.step_comms_phase();

        let near_center = (-gamma * Position::new(3.0, 4.0).distance_to(center)).exp();
        let q = env.agents[1].comm_quality();
        assert!(
            q >= 0.9 * near_center && q <= 1.1 * near_center,
            "leaderless comm quality {q} not anchored on the center"
        );
    }

    #[test]
    fn test_leaderless_tick_keeps_change_count() {
        let config = SimConfig {
            n_agents: 1,
            failure_prob: 0.0,
            ..config(6)
        };
        let mut env = Environment::new(config).unwrap();
        let reputation = env.config().reputation_model();
        assert_eq!(env.leader_id(), Some(0));

        assert_eq!(env.step(0), Some(0));
        assert_eq!(env.metrics().leader_changes, 0);

        // Sink the only agent below the 0.25 threshold
        for _ in 0..10 {
            reputation.update_for_failure(&mut env.agents[0]);
        }
        assert_eq!(env.step(1), None);
        assert_eq!(env.leader_id(), None);
        assert_eq!(env.metrics().leader_changes, 0);

        // Restore it: re-electing after a leaderless tick counts as a change
        for _ in 0..30 {
            reputation.update_from_send(&mut env.agents[0], true);
        }
        assert_eq!(env.step(2), Some(0));
        assert_eq!(env.metrics().leader_changes, 1);

        let changes: Vec<u64> = env.trace().iter().map(|r| r.leader_changes).collect();
        assert_eq!(changes, vec![0, 0, 1]);
    }
}
