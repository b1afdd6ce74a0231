//! Communication Model
//!
//! Link quality is redetermined every tick from geometry alone:
//!
//! ```text
//! q = clamp(exp(-gamma * distance) * U[0.9, 1.1), 0.01, 1.0)
//! ```
//!
//! `distance` is measured to the current leader, or to the area center when
//! there is no leader. No per-link history is kept, so an agent regains
//! signal as soon as it moves close enough.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::geometry::{Bounds, Position};

/// Default distance decay factor
pub const DEFAULT_ATTENUATION: f64 = 0.07;

/// Lower edge of the multiplicative fading factor
const NOISE_FLOOR: f64 = 0.9;

/// Width of the multiplicative fading factor range
const NOISE_SPAN: f64 = 0.2;

/// A live agent never reports worse than this
const MIN_QUALITY: f64 = 0.01;

const MAX_QUALITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommsModel {
    bounds: Bounds,
    gamma: f64,
}

impl CommsModel {
    pub fn new(bounds: Bounds, gamma: f64) -> Self {
        Self { bounds, gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Noise-free attenuation at `distance`.
    pub fn attenuation(&self, distance: f64) -> f64 {
        (-self.gamma * distance).exp()
    }

    /// Recompute `agent`'s comm quality against `leader_position`, or the
    /// area center if there is no leader. Dead agents are pinned to 0 and do
    /// not draw from the RNG.
    pub fn update_comm_quality<R: Rng + ?Sized>(
        &self,
        agent: &mut Agent,
        leader_position: Option<Position>,
        rng: &mut R,
    ) {
        if !agent.is_alive() {
            agent.set_comm_quality(0.0);
            return;
        }
        let anchor = leader_position.unwrap_or_else(|| self.bounds.center());
        let distance = agent.position().distance_to(anchor);
        let fading = NOISE_FLOOR + NOISE_SPAN * rng.gen::<f64>();
        let quality = (self.attenuation(distance) * fading).clamp(MIN_QUALITY, MAX_QUALITY);
        agent.set_comm_quality(quality);
    }
}

impl Default for CommsModel {
    fn default() -> Self {
        Self::new(Bounds::default(), DEFAULT_ATTENUATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_quality_within_noise_band() {
        let model = CommsModel::new(Bounds::new(30.0, 30.0), 0.07);
        let mut rng = create_rng(5);
        let mut agent = Agent::new(0, Position::new(5.0, 15.0), 1.0);

        // 10 units from center
        let clean = model.attenuation(10.0);
        for _ in 0..200 {
            model.update_comm_quality(&mut agent, None, &mut rng);
            let q = agent.comm_quality();
            assert!(q >= clean * 0.9 - 1e-12 && q <= clean * 1.1 + 1e-12, "q={q}");
        }
    }

    #[test]
    fn test_quality_anchored_on_leader() {
        let model = CommsModel::new(Bounds::new(30.0, 30.0), 0.07);
        let mut rng = create_rng(5);
        let mut agent = Agent::new(0, Position::new(0.0, 0.0), 1.0);

        // Co-located with the leader: exp(0) * [0.9, 1.1) clamped to <= 1
        model.update_comm_quality(&mut agent, Some(Position::new(0.0, 0.0)), &mut rng);
        assert!(agent.comm_quality() >= 0.9 && agent.comm_quality() <= 1.0);
    }

    #[test]
    fn test_quality_floor() {
        let model = CommsModel::new(Bounds::new(1000.0, 1000.0), 0.5);
        let mut rng = create_rng(5);
        let mut agent = Agent::new(0, Position::new(0.0, 0.0), 1.0);

        model.update_comm_quality(&mut agent, None, &mut rng);
        assert_eq!(agent.comm_quality(), 0.01);
    }

    #[test]
    fn test_dead_agent_pinned_to_zero() {
        let model = CommsModel::default();
        let mut rng = create_rng(5);
        let mut agent = Agent::new(0, Position::new(15.0, 15.0), 1.0);
        agent.kill();

        model.update_comm_quality(&mut agent, None, &mut rng);
        assert_eq!(agent.comm_quality(), 0.0);
    }
}
