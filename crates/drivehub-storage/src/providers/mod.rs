//! Storage provider implementations.

pub mod local;

pub use local::{LocalStorageProvider, mime_from_name};
