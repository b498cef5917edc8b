use crate::client::protocol::StatusResponse;
use crate::client::types::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Status label the API server reports when the master answered.
pub const STATUS_OPERATIONAL: &str = "operational";
/// Status label recorded locally when the feed could not be fetched.
pub const STATUS_UNAVAILABLE: &str = "unavailable";

/// Liveness of a data node as reported by the master.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum NodeState {
    Alive,
    /// Also used for any status the feed reports that is not `"alive"`,
    /// and for nodes reported without a status.
    Dead,
}

impl NodeState {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(s) if s.eq_ignore_ascii_case("alive") => NodeState::Alive,
            _ => NodeState::Dead,
        }
    }

    pub fn is_alive(&self) -> bool {
        *self == NodeState::Alive
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeStatus {
    pub node_id: NodeId,
    pub state: NodeState,
    /// Unix timestamp (seconds) of the node's last heartbeat, if reported.
    pub last_heartbeat: Option<f64>,
}

/// Cluster-wide status, replaced wholesale on every poll.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemStatus {
    pub status: String,
    pub master_available: bool,
    pub operational: bool,
    pub file_count: usize,
    /// Alive count as reported by the master, which may lag the per-node map.
    pub reported_alive_nodes: Option<usize>,
    pub nodes: BTreeMap<NodeId, NodeStatus>,
}

impl SystemStatus {
    pub fn from_response(response: StatusResponse) -> Self {
        let mut nodes = BTreeMap::new();
        for (key, entry) in response.system_info.data_nodes {
            match key.parse::<NodeId>() {
                Ok(node_id) => {
                    nodes.insert(
                        node_id,
                        NodeStatus {
                            node_id,
                            state: NodeState::from_label(entry.status.as_deref()),
                            last_heartbeat: entry.last_heartbeat,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!("Ignoring data node with invalid id {:?}: {}", key, e);
                }
            }
        }

        Self {
            operational: response.status == STATUS_OPERATIONAL,
            status: response.status,
            master_available: response.master_available,
            file_count: response.file_count,
            reported_alive_nodes: response.system_info.alive_nodes,
            nodes,
        }
    }

    /// Placeholder status recorded when the feed is unreachable.
    pub fn unavailable() -> Self {
        Self {
            status: STATUS_UNAVAILABLE.to_string(),
            master_available: false,
            operational: false,
            file_count: 0,
            reported_alive_nodes: None,
            nodes: BTreeMap::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.master_available && self.operational
    }

    /// Alive node count: the master's own figure when present, otherwise
    /// counted from the per-node map.
    pub fn alive_node_count(&self) -> usize {
        self.reported_alive_nodes
            .unwrap_or_else(|| self.nodes.values().filter(|n| n.state.is_alive()).count())
    }

    pub fn total_node_count(&self) -> usize {
        self.nodes.len()
    }
}
