//! Placement user identity persistence.
//!
//! Lookup by external identifier, creation with duplicate detection, and
//! idempotent provisioning of the incomplete consumer user, over PostgreSQL.

pub mod config;
pub mod domain;
pub mod outbound;
