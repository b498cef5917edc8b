use crate::client::protocol::MetadataResponse;
use crate::client::types::{FileName, NodeId};
use serde::Serialize;
use std::collections::BTreeSet;

/// One chunk of a file and the nodes holding a replica of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub chunk_id: u64,
    /// Replica count as reported by the master. May differ from
    /// `replica_nodes.len()` while re-replication is pending.
    pub replica_count: usize,
    pub replica_nodes: BTreeSet<NodeId>,
}

/// Placement of one file's chunks at the moment it was fetched.
///
/// A snapshot is never updated; the next fetch for the same file replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadataSnapshot {
    pub file_name: FileName,
    pub chunks: Vec<Chunk>,
    pub total_chunk_count: usize,
}

impl FileMetadataSnapshot {
    pub fn from_response(file_name: FileName, response: MetadataResponse) -> Self {
        let chunks: Vec<Chunk> = response
            .replicas
            .into_iter()
            .map(|entry| Chunk {
                chunk_id: entry.chunk_id,
                replica_count: entry.replica_count,
                replica_nodes: entry.replica_nodes.into_iter().map(NodeId).collect(),
            })
            .collect();

        // A zero or missing chunk count falls back to the number of placement entries.
        let total_chunk_count = response
            .chunks
            .filter(|count| *count > 0)
            .unwrap_or(chunks.len());

        Self {
            file_name,
            chunks,
            total_chunk_count,
        }
    }

    /// Replication factor shown for the file: the replica count of its first chunk.
    pub fn replication_factor(&self) -> usize {
        self.chunks
            .first()
            .map(|chunk| chunk.replica_count)
            .unwrap_or(0)
    }

    /// Number of (chunk, replica node) pairs across all chunks.
    pub fn replica_pair_count(&self) -> usize {
        self.chunks.iter().map(|c| c.replica_nodes.len()).sum()
    }

    /// Every node holding at least one chunk of this file.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.chunks
            .iter()
            .flat_map(|c| c.replica_nodes.iter().copied())
            .collect()
    }
}

/// One row of the multi-file placement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationRow {
    pub file_name: FileName,
    pub chunk_count: usize,
    pub replica_entry_count: usize,
    pub node_ids: BTreeSet<NodeId>,
}

impl AggregationRow {
    /// Row used when the file's metadata could not be fetched.
    pub fn empty(file_name: FileName) -> Self {
        Self {
            file_name,
            chunk_count: 0,
            replica_entry_count: 0,
            node_ids: BTreeSet::new(),
        }
    }

    pub fn from_snapshot(snapshot: &FileMetadataSnapshot) -> Self {
        Self {
            file_name: snapshot.file_name.clone(),
            chunk_count: snapshot.total_chunk_count,
            replica_entry_count: snapshot.chunks.len(),
            node_ids: snapshot.node_ids(),
        }
    }
}
