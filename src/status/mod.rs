//! Cluster Status Module
//!
//! Consumes the cluster-wide status feed: node liveness, master availability
//! and file count. It does not detect failures itself; it only reports what
//! the master says.
//!
//! ## Submodules
//! - **`types`**: `SystemStatus`, `NodeStatus` and `NodeState`.
//! - **`window`**: `TimeSeriesWindow`, the bounded FIFO behind the trend charts.
//! - **`poller`**: `StatusPoller`, the owned start/stop polling task.

pub mod poller;
pub mod types;
pub mod window;
