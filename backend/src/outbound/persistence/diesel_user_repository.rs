//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Lookups run in reader transactions and inserts in writer transactions
//! opened through [`DbPool`]. A unique violation on `external_id` is the only
//! database error given a dedicated domain variant.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{ExternalId, NewUser, User, UserKey};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError, TransactionError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use placement_users::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselUserRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user repository errors.
///
/// `external_id` is the identifier the failed statement was working on; it
/// is attached to the `Exists` variant on unique violations.
fn map_diesel_error(error: diesel::result::Error, external_id: &str) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserRepositoryError::query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => UserRepositoryError::exists(external_id),
            DatabaseErrorKind::ClosedConnection => {
                UserRepositoryError::connection("database connection error")
            }
            DatabaseErrorKind::ReadOnlyTransaction => {
                warn!(message = info.message(), "write attempted in reader transaction");
                UserRepositoryError::query("database error")
            }
            _ => UserRepositoryError::query("database error"),
        },
        _ => UserRepositoryError::query("database error"),
    }
}

fn map_transaction_error(error: TransactionError, external_id: &str) -> UserRepositoryError {
    match error {
        TransactionError::Pool(err) => map_pool_error(err),
        TransactionError::Query(err) => map_diesel_error(err, external_id),
    }
}

/// Convert a database row to a domain [`User`].
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let external_id = ExternalId::new(row.external_id).map_err(|err| {
        UserRepositoryError::query(format!("invalid external id in database: {err}"))
    })?;
    Ok(User::hydrate(
        UserKey::from_db(row.id),
        external_id,
        row.created_at,
        row.updated_at,
    ))
}

async fn select_user(
    conn: &mut AsyncPgConnection,
    external_id: &str,
) -> QueryResult<Option<UserRow>> {
    users::table
        .filter(users::external_id.eq(external_id))
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
}

async fn insert_user(conn: &mut AsyncPgConnection, external_id: &str) -> QueryResult<UserRow> {
    let new_row = NewUserRow { external_id };
    diesel::insert_into(users::table)
        .values(&new_row)
        .returning(UserRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<User>, UserRepositoryError> {
        let raw = external_id.as_str();
        let row = self
            .pool
            .reader(|conn| async move { select_user(conn, raw).await }.scope_boxed())
            .await
            .map_err(|err| map_transaction_error(err, raw))?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let raw = user.external_id().as_str();
        let row = self
            .pool
            .writer(|conn| async move { insert_user(conn, raw).await }.scope_boxed())
            .await
            .map_err(|err| map_transaction_error(err, raw))?;

        row_to_user(row)
    }

    async fn find_or_insert_key(
        &self,
        external_id: &ExternalId,
    ) -> Result<UserKey, UserRepositoryError> {
        let raw = external_id.as_str();
        let (id, inserted) = self
            .pool
            .writer(|conn| {
                async move {
                    let existing: Option<i32> = users::table
                        .filter(users::external_id.eq(raw))
                        .select(users::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if let Some(id) = existing {
                        return QueryResult::Ok((id, false));
                    }

                    let new_row = NewUserRow { external_id: raw };
                    let id: i32 = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(users::id)
                        .get_result(conn)
                        .await?;
                    QueryResult::Ok((id, true))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_transaction_error(err, raw))?;

        if inserted {
            debug!(user_id = id, external_id = raw, "inserted user row");
        }
        Ok(UserKey::from_db(id))
    }
}
