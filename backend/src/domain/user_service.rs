//! User lookup, creation and sentinel-user provisioning.
//!
//! The service turns repository results into the outward error contract:
//! an absent row becomes [`UserRepositoryError::NotFound`] and a duplicate
//! external identifier becomes [`UserRepositoryError::Exists`], both carrying
//! the identifier that caused them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{ExternalId, NewUser, User, UserKey};

/// Domain service exposing the user operations.
#[derive(Clone)]
pub struct UserService<R> {
    user_repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service over the given repository.
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Load the user with the given external identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when no row matches.
    pub async fn get_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<User, UserRepositoryError> {
        self.user_repo
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| UserRepositoryError::not_found(external_id.as_str()))
    }

    /// Persist `new_user` and return the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Exists`] when the external identifier
    /// is already taken; no row is added in that case.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, UserRepositoryError> {
        let user = self.user_repo.insert(new_user).await?;
        debug!(
            user_id = %user.id(),
            external_id = %user.external_id(),
            "created user"
        );
        Ok(user)
    }

    /// Return the key of the incomplete consumer user, creating it if needed.
    ///
    /// Safe to call repeatedly. When a concurrent caller inserts the same
    /// sentinel between our lookup and our insert, the existing row is read
    /// back and its key returned.
    pub async fn ensure_incomplete_user(
        &self,
        sentinel: &ExternalId,
    ) -> Result<UserKey, UserRepositoryError> {
        match self.user_repo.find_or_insert_key(sentinel).await {
            Ok(key) => {
                info!(user_id = %key, external_id = %sentinel, "incomplete consumer user ready");
                Ok(key)
            }
            Err(UserRepositoryError::Exists { external_id }) => {
                warn!(%external_id, "incomplete consumer user inserted concurrently; re-reading");
                match self.user_repo.find_by_external_id(sentinel).await? {
                    Some(user) => Ok(user.id()),
                    None => Err(UserRepositoryError::exists(external_id)),
                }
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
