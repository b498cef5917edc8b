//! Chunk Placement Module
//!
//! Reads where each file's chunks and replicas live and summarizes it for the
//! distribution chart (one file) and the placement table (many files).
//!
//! ## Core Concepts
//! - **Snapshot**: A `FileMetadataSnapshot` is created per fetch and never
//!   merged with an earlier one.
//! - **Bounded fan-out**: Batches are capped at `MAX_AGGREGATED_FILES`.
//! - **Fault isolation**: A file whose fetch fails still gets a (zeroed) row.

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod tests;
