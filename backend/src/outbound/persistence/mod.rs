//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Scoped transactions**: every query runs inside a reader or writer
//!   transaction opened by [`DbPool`].
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use placement_users::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/placement");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError, TransactionError};
