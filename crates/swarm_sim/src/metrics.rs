use serde::{Deserialize, Serialize};

/// Cumulative counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmMetrics {
    pub messages_sent: u64,
    pub messages_dropped: u64,
    /// Ticks on which a (non-empty) election result differed from the
    /// previous leader
    pub leader_changes: u64,
}

impl SwarmMetrics {
    pub fn total_attempts(&self) -> u64 {
        self.messages_sent + self.messages_dropped
    }

    /// Fraction of attempts that got through, 0.0 before any attempt.
    pub fn delivery_ratio(&self) -> f64 {
        let total = self.total_attempts();
        if total == 0 {
            return 0.0;
        }
        self.messages_sent as f64 / total as f64
    }

    pub(crate) fn record_send(&mut self, sent: bool) {
        if sent {
            self.messages_sent += 1;
        } else {
            self.messages_dropped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_ratio() {
        let mut metrics = SwarmMetrics::default();
        assert_eq!(metrics.delivery_ratio(), 0.0);

        metrics.record_send(true);
        metrics.record_send(true);
        metrics.record_send(false);
        metrics.record_send(true);

        assert_eq!(metrics.total_attempts(), 4);
        assert!((metrics.delivery_ratio() - 0.75).abs() < 1e-12);
    }
}
