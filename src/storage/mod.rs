//! User storage.
//!
//! [`UserRepository`] is the seam between the service and whatever holds the
//! records; [`InMemoryUserRepository`] is the process-lifetime implementation.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::{DomainError, User, UserId};

pub use memory::InMemoryUserRepository;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("identifier space exhausted")]
    IdsExhausted,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => DomainError::NotFound(err.to_string()),
            StoreError::IdsExhausted => DomainError::Internal(err.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Keyed storage for user records.
///
/// Every record passed in or returned is an owned copy. Absence on lookup is
/// `Ok(None)`, never an error; only `update` and `delete` report `NotFound`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// First record with exactly this name, in iteration order.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    /// Stores `user` under a freshly assigned identifier; the caller's `id`
    /// is ignored.
    async fn create(&self, user: User) -> StoreResult<User>;

    /// Replaces the record with `user.id` wholesale.
    async fn update(&self, user: User) -> StoreResult<User>;

    async fn delete(&self, id: UserId) -> StoreResult<()>;

    /// Skips `offset` records, then returns up to `limit` of the rest.
    async fn list(&self, limit: usize, offset: usize) -> StoreResult<Vec<User>>;
}

#[cfg(test)]
mod tests {
    use super::StoreError;
    use crate::core::{DomainError, ErrorKind};

    #[test]
    fn store_errors_keep_their_classification() {
        assert_eq!(
            DomainError::from(StoreError::NotFound(4)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::from(StoreError::IdsExhausted).kind(),
            ErrorKind::Internal
        );
    }
}
