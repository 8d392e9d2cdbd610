//! # drivehub-database
//!
//! Metadata persistence for DriveHub. The [`MetadataStore`] and
//! [`UserStore`] traits describe the per-owner directory/file tree and the
//! user table; [`PgMetadataStore`] implements them on PostgreSQL and
//! [`MemoryMetadataStore`] keeps everything in process memory.

pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use memory::MemoryMetadataStore;
pub use postgres::PgMetadataStore;
pub use store::{MetadataStore, Subtree, UserStore};
