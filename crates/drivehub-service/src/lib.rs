//! # drivehub-service
//!
//! Business logic service layer for DriveHub. Each service composes the
//! metadata store and the physical storage provider to implement one group
//! of use cases.
//!
//! Services follow constructor injection. All dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod directory;
pub mod file;
pub mod path;
pub mod user;

pub use context::RequestContext;
pub use directory::DirectoryService;
pub use file::{DownloadMode, FileDownload, FileService};
pub use user::{LoginResult, RegisterInput, UserService};

#[cfg(test)]
pub(crate) mod testing;
