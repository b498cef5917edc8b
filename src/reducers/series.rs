//! Chart-ready series built from the reducer outputs.

use super::distribution::{AliveDeadSplit, NodeUsage};
use crate::client::types::NodeId;
use crate::status::types::SystemStatus;
use crate::status::window::TimeSeriesWindow;

use serde::Serialize;
use std::collections::BTreeMap;

/// Parallel label and value vectors, the shape every chart consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

fn node_label(node: NodeId) -> String {
    format!("Node {}", node)
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn from_node_usage(usage: &NodeUsage) -> Self {
        Self {
            labels: usage.iter().map(|(node, _)| node_label(*node)).collect(),
            values: usage.iter().map(|(_, count)| *count).collect(),
        }
    }

    pub fn from_alive_dead(split: &AliveDeadSplit) -> Self {
        Self {
            labels: vec!["Alive".to_string(), "Dead".to_string()],
            values: vec![split.alive, split.dead],
        }
    }

    pub fn from_histogram(histogram: &BTreeMap<String, usize>) -> Self {
        Self {
            labels: histogram.keys().cloned().collect(),
            values: histogram.values().copied().collect(),
        }
    }

    /// One point per node: 1 when alive, 0 otherwise, ascending by node id.
    pub fn node_liveness(status: &SystemStatus) -> Self {
        Self {
            labels: status.nodes.keys().map(|node| node_label(*node)).collect(),
            values: status
                .nodes
                .values()
                .map(|node| usize::from(node.state.is_alive()))
                .collect(),
        }
    }

    pub fn from_window(window: &TimeSeriesWindow<usize>) -> Self {
        Self {
            labels: window.labels(),
            values: window.values(),
        }
    }
}
