//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{ExternalId, NewUser, User, UserKey};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// No user row matches the external identifier.
        NotFound { external_id: String } => "no user found with external id {external_id}",
        /// A user row with the external identifier already exists.
        Exists { external_id: String } => "user with external id {external_id} already exists",
    }
}

/// Driven port over the `users` table.
///
/// Each method runs in its own transaction: lookups in a read-only one,
/// inserts in a read-write one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the user with the given external identifier.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new user row and return it hydrated.
    ///
    /// Fails with [`UserRepositoryError::Exists`] when the external
    /// identifier is already taken.
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Return the key of the row for `external_id`, inserting it when absent.
    ///
    /// The lookup and the insert share one read-write transaction. A
    /// concurrent insert of the same identifier still surfaces as
    /// [`UserRepositoryError::Exists`].
    async fn find_or_insert_key(
        &self,
        external_id: &ExternalId,
    ) -> Result<UserKey, UserRepositoryError>;
}
