//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub external_id: &'a str,
}
