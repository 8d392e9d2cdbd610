//! # drivehub-auth
//!
//! Credential handling for DriveHub.
//!
//! ## Modules
//!
//! - `jwt`: access token creation, validation, and revocation
//! - `password`: Argon2id password hashing and policy enforcement

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
