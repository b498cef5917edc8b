//! Distributed File Store Console Library
//!
//! Client-side state and aggregation layer for operating a chunked, replicated
//! file store through its HTTP API. The binary (`main.rs`) is a thin command
//! line over these modules.
//!
//! ## Architecture Modules
//! - **`client`**: The `RemoteStore` seam and its HTTP implementation. One round
//!   trip per call, typed errors, no retries or caching.
//! - **`files`**: The file lifecycle controller. Owns the listing and the editor
//!   state and keeps them consistent with the cluster, one operation at a time.
//! - **`metadata`**: Chunk placement snapshots and the fault-isolated,
//!   bounded fan-out over many files.
//! - **`status`**: The status feed model, bounded time-series windows, and the
//!   start/stop poller that fills them.
//! - **`reducers`**: Pure transforms into chart-ready figures and series.
//! - **`config`**: Command-line and environment configuration.

pub mod client;
pub mod config;
pub mod files;
pub mod metadata;
pub mod reducers;
pub mod status;
