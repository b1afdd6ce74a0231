//! Per-tick trace records.
//!
//! The trace is the engine's only output artifact. Each record can be
//! flattened into a table row: fixed columns first, then five columns per
//! agent keyed by agent id.

use serde::{Deserialize, Serialize};
use swarm_core::{AgentId, AgentSnapshot};

use crate::metrics::SwarmMetrics;

const FIXED_COLUMNS: [&str; 5] = [
    "step",
    "leader",
    "messages_sent",
    "messages_dropped",
    "leader_changes",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub step: u64,
    pub leader: Option<AgentId>,
    /// Cumulative counters as of the end of this tick
    pub messages_sent: u64,
    pub messages_dropped: u64,
    pub leader_changes: u64,
    pub agents: Vec<AgentSnapshot>,
}

/// One table cell of a flattened record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceCell {
    Int(u64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl TraceRecord {
    pub fn new(
        step: u64,
        leader: Option<AgentId>,
        metrics: &SwarmMetrics,
        agents: Vec<AgentSnapshot>,
    ) -> Self {
        Self {
            step,
            leader,
            messages_sent: metrics.messages_sent,
            messages_dropped: metrics.messages_dropped,
            leader_changes: metrics.leader_changes,
            agents,
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    /// Column names matching [`TraceRecord::cells`].
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for agent in &self.agents {
            let id = agent.id;
            columns.push(format!("agent_{id}_pos_x"));
            columns.push(format!("agent_{id}_pos_y"));
            columns.push(format!("agent_{id}_battery"));
            columns.push(format!("agent_{id}_rep"));
            columns.push(format!("agent_{id}_alive"));
        }
        columns
    }

    pub fn cells(&self) -> Vec<TraceCell> {
        let mut cells = vec![
            TraceCell::Int(self.step),
            self.leader
                .map_or(TraceCell::Empty, |id| TraceCell::Int(id as u64)),
            TraceCell::Int(self.messages_sent),
            TraceCell::Int(self.messages_dropped),
            TraceCell::Int(self.leader_changes),
        ];
        for agent in &self.agents {
            cells.push(TraceCell::Float(agent.position.x));
            cells.push(TraceCell::Float(agent.position.y));
            cells.push(TraceCell::Float(agent.battery));
            cells.push(TraceCell::Float(agent.reputation));
            cells.push(TraceCell::Bool(agent.alive));
        }
        cells
    }
}

/// Headline numbers of a finished run, read off the last trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: usize,
    pub leader_changes: Option<u64>,
    pub messages_sent: Option<u64>,
    pub messages_dropped: Option<u64>,
}

impl RunSummary {
    pub fn from_trace(trace: &[TraceRecord]) -> Self {
        let last = trace.last();
        Self {
            steps: trace.len(),
            leader_changes: last.map(|r| r.leader_changes),
            messages_sent: last.map(|r| r.messages_sent),
            messages_dropped: last.map(|r| r.messages_dropped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::Position;

    fn snapshot(id: AgentId, alive: bool) -> AgentSnapshot {
        AgentSnapshot {
            id,
            position: Position::new(1.0, 2.0),
            battery: 0.5,
            reputation: 0.5,
            alive,
        }
    }

    fn record(step: u64, leader: Option<AgentId>) -> TraceRecord {
        let metrics = SwarmMetrics {
            messages_sent: 3 * (step + 1),
            messages_dropped: step,
            leader_changes: step / 2,
        };
        TraceRecord::new(step, leader, &metrics, vec![snapshot(0, true), snapshot(7, false)])
    }

    #[test]
    fn test_columns_match_cells() {
        let rec = record(4, Some(7));
        let columns = rec.columns();
        let cells = rec.cells();

        assert_eq!(columns.len(), cells.len());
        assert_eq!(columns.len(), 5 + 2 * 5);
        assert_eq!(columns[5], "agent_0_pos_x");
        assert_eq!(columns[14], "agent_7_alive");
        assert_eq!(cells[1], TraceCell::Int(7));
        assert_eq!(cells[14], TraceCell::Bool(false));
    }

    #[test]
    fn test_missing_leader_is_empty_cell() {
        let rec = record(0, None);
        assert_eq!(rec.cells()[1], TraceCell::Empty);
        assert_eq!(rec.alive_count(), 1);
        assert!(rec.agent(7).is_some());
        assert!(rec.agent(3).is_none());
    }

    #[test]
    fn test_summary_reads_last_record() {
        let trace: Vec<TraceRecord> = (0..10).map(|s| record(s, Some(0))).collect();
        let summary = RunSummary::from_trace(&trace);
        assert_eq!(summary.steps, 10);
        assert_eq!(summary.messages_sent, Some(30));
        assert_eq!(summary.messages_dropped, Some(9));
        assert_eq!(summary.leader_changes, Some(4));

        let empty = RunSummary::from_trace(&[]);
        assert_eq!(empty.steps, 0);
        assert_eq!(empty.leader_changes, None);
    }
}
