//! # drivehub-cache
//!
//! Cache provider implementations for DriveHub. The in-process
//! [moka](https://crates.io/crates/moka) cache backs short-lived entries
//! such as the token blocklist.

pub mod keys;
pub mod memory;
pub mod provider;

pub use provider::CacheManager;
