use crate::client::types::{FileName, NodeId};
use crate::metadata::types::FileMetadataSnapshot;
use crate::status::types::{NodeStatus, SystemStatus};

use serde::Serialize;
use std::collections::BTreeMap;

/// Histogram bucket for names without a usable extension.
pub const NO_EXTENSION: &str = "no extension";

/// Chunks held per node, ascending by node id.
pub type NodeUsage = Vec<(NodeId, usize)>;

pub fn node_usage(snapshot: &FileMetadataSnapshot) -> NodeUsage {
    let mut counts: BTreeMap<NodeId, usize> = BTreeMap::new();
    for chunk in &snapshot.chunks {
        for node in &chunk.replica_nodes {
            *counts.entry(*node).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AliveDeadSplit {
    pub alive: usize,
    pub dead: usize,
}

/// Counts nodes by reported state. Nodes without a recognised status were
/// already parsed as dead.
pub fn alive_dead_split(nodes: &BTreeMap<NodeId, NodeStatus>) -> AliveDeadSplit {
    nodes
        .values()
        .fold(AliveDeadSplit::default(), |mut split, node| {
            if node.state.is_alive() {
                split.alive += 1;
            } else {
                split.dead += 1;
            }
            split
        })
}

/// Lowercased text after the last `.`; hidden files (`.bashrc`), names
/// without a dot and names ending in a dot have no extension.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => name[index + 1..].to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

pub fn extension_histogram(files: &[FileName]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in files {
        *counts.entry(extension_of(file.as_str())).or_insert(0) += 1;
    }
    counts
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub healthy: bool,
    pub file_count: usize,
    pub total_nodes: usize,
    pub alive_nodes: usize,
    /// Known nodes minus the alive count, never negative.
    pub dead_nodes: usize,
}

pub fn cluster_summary(status: &SystemStatus) -> ClusterSummary {
    let total_nodes = status.total_node_count();
    let alive_nodes = status.alive_node_count();

    ClusterSummary {
        healthy: status.is_healthy(),
        file_count: status.file_count,
        total_nodes,
        alive_nodes,
        dead_nodes: total_nodes.saturating_sub(alive_nodes),
    }
}
