//! File Lifecycle Module
//!
//! Keeps the console's view of the file namespace and the open file consistent
//! with the cluster, which stays authoritative.
//!
//! ## Core Concepts
//! - **FileSet**: The ordered listing, replaced wholesale on every refresh and never diffed.
//! - **EditorState**: Selection, content buffer, loading flag and the single error message.
//! - **Last write wins**: Conflicting views are resolved in favour of the most
//!   recent successful operation issued from this console.

pub mod controller;
pub mod types;
