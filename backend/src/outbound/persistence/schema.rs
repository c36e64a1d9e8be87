//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Placement users table.
    ///
    /// One row per external identity. `external_id` carries the
    /// `uniq_users0external_id` unique constraint.
    users (id) {
        /// Primary key: database-generated serial.
        id -> Int4,
        /// Caller-supplied identifier (max 255 characters).
        external_id -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (set by trigger on update).
        updated_at -> Nullable<Timestamptz>,
    }
}
