//! Department error types.

use thiserror::Error;

/// Result type for department operations.
pub type Result<T> = std::result::Result<T, DepartmentError>;

/// Errors raised by the department store.
///
/// Not-found conditions are not errors: lookups return `Option` and
/// mutators return `Ok(false)`. Only a failed snapshot write surfaces
/// here, since there is no recovery strategy for it.
#[derive(Debug, Error)]
pub enum DepartmentError {
    /// Writing the snapshot file failed.
    #[error(transparent)]
    Persist(#[from] department_persistence::PersistError),
}
