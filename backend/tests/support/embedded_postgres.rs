//! Shared embedded PostgreSQL helpers for integration tests.
//!
//! - Database reset and creation use `postgres` to avoid Diesel transaction
//!   semantics interfering with `DROP DATABASE`.
//! - Schema setup runs embedded Diesel migrations so test schemas do not drift.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MAINTENANCE_DB: &str = "postgres";

/// Drops and recreates `db_name` on the cluster.
pub fn reset_database(cluster: &TestCluster, db_name: &str) -> Result<(), String> {
    let url = cluster.connection().database_url(MAINTENANCE_DB);
    let mut client = Client::connect(&url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE); CREATE DATABASE \"{db_name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err:?}"))?;
    Ok(())
}

/// Counts `users` rows carrying `external_id`.
pub fn count_users(url: &str, external_id: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM users WHERE external_id = $1",
            &[&external_id],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
