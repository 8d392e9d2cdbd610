//! User registration and sessions.

pub mod service;

pub use service::{LoginResult, RegisterInput, UserService};
