//! Storage layer for athena.
//!
//! The offline queue persists itself as a single serialized blob. This
//! module provides the blob store abstraction and its implementations:
//! - `SqliteBlobStore` - the on-disk store backed by `athena.db`
//! - `MemoryBlobStore` - a process-local store

mod blob;
mod database;
mod migrations;

pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use database::Database;

#[cfg(test)]
pub use blob::MockBlobStore;
