//! Metadata Aggregation Engine
//!
//! Fetches chunk placement for one file or for a batch of files. Batch fetches
//! run concurrently on the caller's task and are fault-isolated per file: a
//! failed fetch becomes an empty row in place, it never cancels its siblings
//! and never fails the batch.

use super::types::{AggregationRow, FileMetadataSnapshot};
use crate::client::store::RemoteStore;
use crate::client::types::{FileName, StoreResult};
use crate::reducers::distribution::{NodeUsage, node_usage};

use futures::future::join_all;
use std::sync::Arc;

/// Upper bound on the number of files fetched in one batch.
pub const MAX_AGGREGATED_FILES: usize = 20;

/// A single file's placement together with its per-node chunk counts.
#[derive(Debug, Clone)]
pub struct FileDistribution {
    pub snapshot: FileMetadataSnapshot,
    pub usage: NodeUsage,
}

pub struct MetadataAggregator {
    store: Arc<dyn RemoteStore>,
}

impl MetadataAggregator {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Fetches one file's metadata and counts how many of its chunks each node holds.
    pub async fn file_distribution(&self, name: &FileName) -> StoreResult<FileDistribution> {
        let snapshot = self.store.file_metadata(name).await?;
        let usage = node_usage(&snapshot);

        tracing::debug!(
            "{}: {} chunks over {} nodes",
            name,
            snapshot.total_chunk_count,
            usage.len()
        );

        Ok(FileDistribution { snapshot, usage })
    }

    /// Builds one row per file for the first `MAX_AGGREGATED_FILES` names, in
    /// input order, regardless of the order in which the fetches complete.
    pub async fn aggregate(&self, files: &[FileName]) -> Vec<AggregationRow> {
        let limited = &files[..files.len().min(MAX_AGGREGATED_FILES)];
        if limited.len() < files.len() {
            tracing::debug!(
                "Aggregating first {} of {} files",
                limited.len(),
                files.len()
            );
        }

        let fetches = limited.iter().map(|name| self.fetch_row(name));
        join_all(fetches).await
    }

    /// Lists the cluster's files and aggregates them. Only a failed listing
    /// fails the batch.
    pub async fn aggregate_cluster(&self) -> StoreResult<Vec<AggregationRow>> {
        let files = self.store.list_files().await?;
        Ok(self.aggregate(&files).await)
    }

    async fn fetch_row(&self, name: &FileName) -> AggregationRow {
        match self.store.file_metadata(name).await {
            Ok(snapshot) => AggregationRow::from_snapshot(&snapshot),
            Err(e) => {
                tracing::warn!("Metadata fetch for {} failed: {}", name, e);
                AggregationRow::empty(name.clone())
            }
        }
    }
}
