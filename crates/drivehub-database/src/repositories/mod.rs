//! PostgreSQL repositories for DriveHub metadata.

pub mod directory;
pub mod file;
pub mod user;

pub use directory::DirectoryRepository;
pub use file::FileRepository;
pub use user::UserRepository;

use drivehub_core::error::{AppError, ErrorKind};

/// Map a failed write into an [`AppError`], turning known unique
/// constraint violations into validation errors.
pub(crate) fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("directories_owner_parent_name_key") => {
                return AppError::validation("A directory with that name already exists here");
            }
            Some("files_owner_parent_name_key") => {
                return AppError::validation("A file with that name already exists here");
            }
            Some("users_email_lower_key") => {
                return AppError::validation("Email is already registered");
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}

/// Whether the error is a foreign key violation.
pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
