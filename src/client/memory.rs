//! In-memory stand-in for the cluster, used by the unit tests of every
//! component that talks to a `RemoteStore`.
//!
//! Files live in a sorted map. Metadata is derived by cutting the content into
//! fixed-size chunks and placing replicas round-robin over the data nodes,
//! the same way the master does. Failures, delays and gates can be injected per
//! operation, and every call is recorded in `calls`.

use super::store::RemoteStore;
use super::types::{FileContent, FileName, NodeId, StoreError, StoreResult};
use crate::metadata::types::{Chunk, FileMetadataSnapshot};
use crate::status::types::{NodeState, NodeStatus, STATUS_OPERATIONAL, SystemStatus};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub struct MemoryStore {
    files: Mutex<BTreeMap<String, String>>,
    pub chunk_size: usize,
    pub replication: usize,
    pub nodes: Mutex<BTreeMap<u32, NodeState>>,
    /// Inserted by the "server" between existing content and appended text.
    pub append_separator: Mutex<String>,
    pub failing: Mutex<HashSet<&'static str>>,
    pub failing_metadata: Mutex<HashSet<String>>,
    pub metadata_delays: Mutex<HashMap<String, Duration>>,
    /// Scripted status responses, consumed front to back before falling back
    /// to a status computed from the current files and nodes.
    pub scripted_status: Mutex<VecDeque<StoreResult<SystemStatus>>>,
    pub status_gate: Mutex<Option<Arc<Notify>>>,
    pub read_gate: Mutex<Option<Arc<Notify>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let nodes = (1..=3).map(|id| (id, NodeState::Alive)).collect();
        Self {
            files: Mutex::new(BTreeMap::new()),
            chunk_size: 4,
            replication: 2,
            nodes: Mutex::new(nodes),
            append_separator: Mutex::new(String::new()),
            failing: Mutex::new(HashSet::new()),
            failing_metadata: Mutex::new(HashSet::new()),
            metadata_delays: Mutex::new(HashMap::new()),
            scripted_status: Mutex::new(VecDeque::new()),
            status_gate: Mutex::new(None),
            read_gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (name, content) in files {
            store.put(name, content);
        }
        store
    }

    pub fn put(&self, name: &str, content: &str) {
        self.files
            .lock()
            .insert(name.to_string(), content.to_string());
    }

    pub fn content_of(&self, name: &str) -> Option<String> {
        self.files.lock().get(name).cloned()
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().remove(operation);
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, operation: &'static str, subject: &str) -> StoreResult<()> {
        self.calls.lock().push(format!("{} {}", operation, subject));
        if self.failing.lock().contains(operation) {
            return Err(StoreError::Server { status: 500 });
        }
        Ok(())
    }

    fn placement(&self, content: &str) -> Vec<Chunk> {
        let node_ids: Vec<u32> = self
            .nodes
            .lock()
            .iter()
            .filter(|(_, state)| state.is_alive())
            .map(|(id, _)| *id)
            .collect();

        let bytes = content.as_bytes();
        let chunk_count = bytes.len().div_ceil(self.chunk_size.max(1));

        (0..chunk_count)
            .map(|index| {
                let replica_nodes: std::collections::BTreeSet<NodeId> = (0..self
                    .replication
                    .min(node_ids.len()))
                    .map(|offset| NodeId(node_ids[(index + offset) % node_ids.len()]))
                    .collect();
                Chunk {
                    chunk_id: index as u64,
                    replica_count: replica_nodes.len(),
                    replica_nodes,
                }
            })
            .collect()
    }

    fn computed_status(&self) -> SystemStatus {
        let nodes: BTreeMap<NodeId, NodeStatus> = self
            .nodes
            .lock()
            .iter()
            .map(|(id, state)| {
                (
                    NodeId(*id),
                    NodeStatus {
                        node_id: NodeId(*id),
                        state: *state,
                        last_heartbeat: None,
                    },
                )
            })
            .collect();
        let alive = nodes.values().filter(|n| n.state.is_alive()).count();

        SystemStatus {
            status: STATUS_OPERATIONAL.to_string(),
            master_available: true,
            operational: true,
            file_count: self.files.lock().len(),
            reported_alive_nodes: Some(alive),
            nodes,
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_files(&self) -> StoreResult<Vec<FileName>> {
        self.record("list", "")?;
        Ok(self.files.lock().keys().cloned().map(FileName).collect())
    }

    async fn read_file(&self, name: &FileName) -> StoreResult<FileContent> {
        self.record("read", name.as_str())?;
        let gate = self.read_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.files.lock().get(name.as_str()) {
            Some(text) => Ok(FileContent {
                text: text.clone(),
                partial: false,
            }),
            None => Err(StoreError::NotFound(format!("ERROR: File not found: {}", name))),
        }
    }

    async fn create_file(&self, name: &FileName, content: &str) -> StoreResult<()> {
        self.record("create", name.as_str())?;
        let mut files = self.files.lock();
        if files.contains_key(name.as_str()) {
            return Err(StoreError::Conflict("ERROR: File already exists".to_string()));
        }
        files.insert(name.0.clone(), content.to_string());
        Ok(())
    }

    async fn write_file(&self, name: &FileName, content: &str) -> StoreResult<()> {
        self.record("write", name.as_str())?;
        match self.files.lock().get_mut(name.as_str()) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(name.0.clone())),
        }
    }

    async fn append_file(&self, name: &FileName, text: &str) -> StoreResult<()> {
        self.record("append", name.as_str())?;
        let separator = self.append_separator.lock().clone();
        match self.files.lock().get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(&separator);
                existing.push_str(text);
                Ok(())
            }
            None => Err(StoreError::NotFound(name.0.clone())),
        }
    }

    async fn delete_file(&self, name: &FileName) -> StoreResult<()> {
        self.record("delete", name.as_str())?;
        match self.files.lock().remove(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(name.0.clone())),
        }
    }

    async fn file_metadata(&self, name: &FileName) -> StoreResult<FileMetadataSnapshot> {
        self.record("metadata", name.as_str())?;
        let delay = self.metadata_delays.lock().get(name.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_metadata.lock().contains(name.as_str()) {
            return Err(StoreError::Server { status: 500 });
        }

        let content = self
            .content_of(name.as_str())
            .ok_or_else(|| StoreError::NotFound(name.0.clone()))?;
        let chunks = self.placement(&content);

        Ok(FileMetadataSnapshot {
            file_name: name.clone(),
            total_chunk_count: chunks.len(),
            chunks,
        })
    }

    async fn system_status(&self) -> StoreResult<SystemStatus> {
        self.record("status", "")?;
        let gate = self.status_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.scripted_status.lock().pop_front();
        match scripted {
            Some(result) => result,
            None => Ok(self.computed_status()),
        }
    }

    async fn health(&self) -> StoreResult<bool> {
        self.record("health", "")?;
        Ok(true)
    }
}
