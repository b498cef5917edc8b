//! Cluster API Protocol
//!
//! Endpoint paths and Data Transfer Objects for the HTTP surface exposed by the
//! cluster's API server. Domain types are built from these in the owning
//! modules; nothing outside `client` sees the raw wire shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- API Endpoints ---

/// Collection endpoint: list files, and prefix for per-file routes.
pub const ENDPOINT_FILES: &str = "/api/files";
/// Suffix for server-side append on a file route.
pub const SUFFIX_APPEND: &str = "/append";
/// Suffix for chunk/replica placement on a file route.
pub const SUFFIX_METADATA: &str = "/metadata";
/// Cluster-wide status feed.
pub const ENDPOINT_SYSTEM_STATUS: &str = "/api/system/status";
/// Master reachability probe.
pub const ENDPOINT_HEALTH: &str = "/api/health";

// --- Data Transfer Objects ---

/// Response of `GET /api/files`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Response of `GET /api/files/{name}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub content: String,
    /// Present (and `true`) when the read was only partially assembled.
    #[serde(default)]
    pub warning: bool,
}

/// Body of create, overwrite and append requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

/// Error payload carried by non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One chunk's placement, as reported by `GET /api/files/{name}/metadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicaEntry {
    pub chunk_id: u64,
    #[serde(default)]
    pub replica_count: usize,
    #[serde(default)]
    pub replica_nodes: Vec<u32>,
}

/// Response of `GET /api/files/{name}/metadata`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MetadataResponse {
    #[serde(default)]
    pub chunks: Option<usize>,
    #[serde(default)]
    pub replicas: Vec<ReplicaEntry>,
}

/// Per-node entry of the status feed's `data_nodes` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataNodeEntry {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_heartbeat: Option<f64>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// The `system_info` block of the status feed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub alive_nodes: Option<usize>,
    /// Keyed by the node id rendered as a string.
    #[serde(default)]
    pub data_nodes: BTreeMap<String, DataNodeEntry>,
    #[serde(default)]
    pub total_files: Option<usize>,
}

/// Response of `GET /api/system/status`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub master_available: bool,
    #[serde(default)]
    pub file_count: usize,
    #[serde(default)]
    pub system_info: SystemInfo,
}

/// Response of `GET /api/health`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub master_available: bool,
}
