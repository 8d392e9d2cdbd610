//! # drivehub-storage
//!
//! Physical side of the DriveHub file tree: the [`PathResolver`] that keeps
//! every filesystem access inside the storage root, the on-disk key layout,
//! and the local filesystem [`StorageProvider`](drivehub_core::traits::StorageProvider).

pub mod layout;
pub mod providers;
pub mod resolver;

pub use providers::LocalStorageProvider;
pub use resolver::PathResolver;
