//! Pooled PostgreSQL connections with reader and writer transaction scopes.
//!
//! Repositories never hold a raw connection. They hand a unit of work to
//! [`DbPool::reader`] or [`DbPool::writer`], which check out a `bb8`
//! connection and run the work in a `READ ONLY` or `READ WRITE` transaction.
//! The transaction commits when the work returns `Ok` and rolls back on `Err`.

use std::time::Duration;

use diesel::result::QueryResult;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::scoped_futures::ScopedBoxFuture;

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Failure of a unit of work run through [`DbPool::reader`] or
/// [`DbPool::writer`].
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// No connection could be checked out.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// A statement, the commit or the rollback failed.
    #[error(transparent)]
    Query(#[from] diesel::result::Error),
}

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_SIZE: u32 = 10;

/// Checkout timeout applied to every pool.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
}

impl PoolConfig {
    /// Configuration for `database_url` with [`DEFAULT_MAX_SIZE`] connections
    /// and two kept idle.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(2),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the minimum number of idle connections to maintain.
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Get the maximum pool size.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Async connection pool handing out reader and writer transactions.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Create a new connection pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` if the pool cannot be constructed (e.g.,
    /// invalid database URL or connection failure).
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection, waiting at most the checkout timeout.
    async fn get(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    /// Run `work` inside a read-only transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Pool` when no connection is available and
    /// `TransactionError::Query` when `work` or the transaction itself fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let count = pool
    ///     .reader(|conn| users::table.count().get_result::<i64>(conn).scope_boxed())
    ///     .await?;
    /// ```
    pub async fn reader<'a, T, F>(&self, work: F) -> Result<T, TransactionError>
    where
        F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, QueryResult<T>>
            + Send
            + 'a,
        T: Send + 'a,
    {
        let mut conn = self.get().await?;
        let value = conn
            .build_transaction()
            .read_only()
            .run(work)
            .await?;
        Ok(value)
    }

    /// Run `work` inside a read-write transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Pool` when no connection is available and
    /// `TransactionError::Query` when `work` or the transaction itself fails.
    pub async fn writer<'a, T, F>(&self, work: F) -> Result<T, TransactionError>
    where
        F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, QueryResult<T>>
            + Send
            + 'a,
        T: Send + 'a,
    {
        let mut conn = self.get().await?;
        let value = conn
            .build_transaction()
            .read_write()
            .run(work)
            .await?;
        Ok(value)
    }
}
