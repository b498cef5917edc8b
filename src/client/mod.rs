//! Remote Store Client
//!
//! A stateless request/response layer over the cluster's HTTP API. Each
//! operation is a single round trip that either yields its payload or fails
//! with a typed `StoreError` derived from the transport response.
//!
//! ## Submodules
//! - **`store`**: The `RemoteStore` trait every other component depends on.
//! - **`http`**: `HttpStoreClient`, the `reqwest` implementation.
//! - **`protocol`**: Endpoint paths and wire DTOs.
//! - **`types`**: File names, node ids, file content and the error taxonomy.

pub mod http;
pub mod protocol;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod memory;
