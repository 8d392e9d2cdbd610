//! File upload, download, and management.

pub mod download;
pub mod service;

pub use download::{DownloadMode, FileDownload};
pub use service::FileService;
