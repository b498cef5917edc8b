//! Metadata Module Tests
//!
//! ## Test Scopes
//! - **Snapshots**: Decoding of placement responses and derived figures.
//! - **Single file**: Per-node chunk counts.
//! - **Batch**: Input-order output, per-file fault isolation, the fan-out cap,
//!   and concurrent dispatch (measured on tokio's paused clock).

#[cfg(test)]
mod tests {
    use crate::client::memory::MemoryStore;
    use crate::client::protocol::{MetadataResponse, ReplicaEntry};
    use crate::client::types::{FileName, NodeId};
    use crate::metadata::aggregator::{MAX_AGGREGATED_FILES, MetadataAggregator};
    use crate::metadata::types::{AggregationRow, FileMetadataSnapshot};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn names(names: &[&str]) -> Vec<FileName> {
        names.iter().map(|n| FileName::from(*n)).collect()
    }

    // ============================================================
    // SNAPSHOT TESTS
    // ============================================================

    #[test]
    fn test_snapshot_from_response() {
        let response = MetadataResponse {
            chunks: Some(2),
            replicas: vec![
                ReplicaEntry {
                    chunk_id: 0,
                    replica_count: 3,
                    replica_nodes: vec![2, 1, 2],
                },
                ReplicaEntry {
                    chunk_id: 1,
                    replica_count: 2,
                    replica_nodes: vec![3, 1],
                },
            ],
        };

        let snapshot = FileMetadataSnapshot::from_response(FileName::from("a.txt"), response);

        assert_eq!(snapshot.total_chunk_count, 2);
        assert_eq!(snapshot.replication_factor(), 3);
        assert_eq!(
            snapshot.chunks[0].replica_nodes,
            BTreeSet::from([NodeId(1), NodeId(2)])
        );
        assert_eq!(snapshot.replica_pair_count(), 4);
    }

    #[test]
    fn test_missing_chunk_count_falls_back_to_entries() {
        let response = MetadataResponse {
            chunks: None,
            replicas: vec![ReplicaEntry::default(), ReplicaEntry::default()],
        };
        let snapshot = FileMetadataSnapshot::from_response(FileName::from("a"), response);
        assert_eq!(snapshot.total_chunk_count, 2);

        let empty = FileMetadataSnapshot::from_response(
            FileName::from("b"),
            MetadataResponse::default(),
        );
        assert_eq!(empty.total_chunk_count, 0);
        assert_eq!(empty.replication_factor(), 0);
    }

    #[test]
    fn test_row_from_snapshot() {
        let response = MetadataResponse {
            chunks: Some(5),
            replicas: vec![
                ReplicaEntry {
                    chunk_id: 0,
                    replica_count: 2,
                    replica_nodes: vec![4, 1],
                },
                ReplicaEntry {
                    chunk_id: 1,
                    replica_count: 2,
                    replica_nodes: vec![1, 9],
                },
            ],
        };
        let snapshot = FileMetadataSnapshot::from_response(FileName::from("x"), response);

        let row = AggregationRow::from_snapshot(&snapshot);

        assert_eq!(row.chunk_count, 5);
        assert_eq!(row.replica_entry_count, 2);
        assert_eq!(
            row.node_ids.into_iter().collect::<Vec<_>>(),
            vec![NodeId(1), NodeId(4), NodeId(9)]
        );
    }

    // ============================================================
    // SINGLE FILE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_file_distribution_counts_chunks_per_node() {
        // 10 bytes in 4-byte chunks over nodes 1..3 with two replicas each.
        let store = Arc::new(MemoryStore::with_files(&[("a.txt", "abcdefghij")]));
        let aggregator = MetadataAggregator::new(store);

        let distribution = aggregator
            .file_distribution(&FileName::from("a.txt"))
            .await
            .unwrap();

        assert_eq!(distribution.snapshot.total_chunk_count, 3);
        assert_eq!(
            distribution.usage,
            vec![(NodeId(1), 2), (NodeId(2), 2), (NodeId(3), 2)]
        );
    }

    #[tokio::test]
    async fn test_file_distribution_of_missing_file_fails() {
        let store = Arc::new(MemoryStore::new());
        let aggregator = MetadataAggregator::new(store);

        let result = aggregator.file_distribution(&FileName::from("nope")).await;
        assert!(result.unwrap_err().is_not_found());
    }

    // ============================================================
    // BATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_row_in_place() {
        let store = Arc::new(MemoryStore::with_files(&[
            ("a", "12345"),
            ("b", "12345"),
            ("c", "12345"),
        ]));
        store.failing_metadata.lock().insert("b".to_string());
        let aggregator = MetadataAggregator::new(store);

        let rows = aggregator.aggregate(&names(&["a", "b", "c"])).await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], AggregationRow::empty(FileName::from("b")));
        assert_eq!(rows[0].chunk_count, 2);
        assert_eq!(rows[2].chunk_count, 2);
        assert!(!rows[2].node_ids.is_empty());
    }

    #[tokio::test]
    async fn test_file_deleted_mid_batch_yields_empty_row() {
        let store = Arc::new(MemoryStore::with_files(&[("a", "1"), ("c", "3")]));
        let aggregator = MetadataAggregator::new(store);

        let rows = aggregator.aggregate(&names(&["a", "b", "c"])).await;

        let files: Vec<&str> = rows.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(files, vec!["a", "b", "c"]);
        assert_eq!(rows[1].chunk_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_order_ignores_completion_order() {
        let store = Arc::new(MemoryStore::with_files(&[
            ("slow", "x"),
            ("fast", "x"),
            ("medium", "x"),
        ]));
        {
            let mut delays = store.metadata_delays.lock();
            delays.insert("slow".to_string(), Duration::from_millis(300));
            delays.insert("medium".to_string(), Duration::from_millis(100));
        }
        let aggregator = MetadataAggregator::new(store);

        let rows = aggregator
            .aggregate(&names(&["slow", "fast", "medium"]))
            .await;

        let files: Vec<&str> = rows.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(files, vec!["slow", "fast", "medium"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_run_concurrently() {
        let files: Vec<(String, String)> = (0..5)
            .map(|i| (format!("f{}", i), "data".to_string()))
            .collect();
        let store = Arc::new(MemoryStore::new());
        for (name, content) in &files {
            store.put(name, content);
            store
                .metadata_delays
                .lock()
                .insert(name.clone(), Duration::from_secs(1));
        }
        let aggregator = MetadataAggregator::new(store);
        let input: Vec<FileName> = files.iter().map(|(n, _)| FileName::from(n.as_str())).collect();

        let started = tokio::time::Instant::now();
        let rows = aggregator.aggregate(&input).await;

        assert_eq!(rows.len(), 5);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_batch_is_capped() {
        let store = Arc::new(MemoryStore::new());
        let input: Vec<FileName> = (0..25).map(|i| FileName::from(format!("f{:02}", i))).collect();
        for name in &input {
            store.put(name.as_str(), "x");
        }
        let aggregator = MetadataAggregator::new(store.clone());

        let rows = aggregator.aggregate(&input).await;

        assert_eq!(rows.len(), MAX_AGGREGATED_FILES);
        assert_eq!(rows.last().unwrap().file_name, "f19");
        assert_eq!(store.calls_to("metadata"), MAX_AGGREGATED_FILES);
    }

    #[tokio::test]
    async fn test_aggregate_cluster_uses_listing() {
        let store = Arc::new(MemoryStore::with_files(&[("b", "2"), ("a", "1")]));
        let aggregator = MetadataAggregator::new(store.clone());

        let rows = aggregator.aggregate_cluster().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file_name, "a");

        store.fail("list");
        assert!(aggregator.aggregate_cluster().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_listing_gives_empty_table() {
        let store = Arc::new(MemoryStore::new());
        let aggregator = MetadataAggregator::new(store);
        assert!(aggregator.aggregate_cluster().await.unwrap().is_empty());
    }
}
