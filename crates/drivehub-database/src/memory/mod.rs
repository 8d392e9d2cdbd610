//! In-process metadata store for development and tests.

pub mod store;

pub use store::MemoryMetadataStore;
