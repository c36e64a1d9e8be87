//! Provision the incomplete consumer user and print its internal id.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use placement_users::config::PlacementSettings;
use placement_users::domain::{ExternalId, UserService};
use placement_users::outbound::persistence::{DbPool, DieselUserRepository};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `ensure-incomplete-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ensure-incomplete-user",
    about = "Create the incomplete consumer user if missing and print its id",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to settings, then `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Sentinel external id overriding the configured value.
    #[arg(long = "external-id", value_name = "id")]
    external_id: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = PlacementSettings::load_from_iter([OsString::from("ensure-incomplete-user")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let sentinel = resolve_sentinel(args.external_id, &settings)?;
    let database_url = resolve_database_url(args.database_url.or(settings.database_url.clone()))?;

    let pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let service = UserService::new(Arc::new(DieselUserRepository::new(pool)));

    let user_id = service
        .ensure_incomplete_user(&sentinel)
        .await
        .map_err(|error| io::Error::other(format!("ensure incomplete user failed: {error}")))?;

    info!(%user_id, external_id = %sentinel, "incomplete consumer user provisioned");
    println!("user_id={user_id}");
    println!("external_id={sentinel}");
    Ok(())
}

fn resolve_sentinel(
    explicit: Option<String>,
    settings: &PlacementSettings,
) -> io::Result<ExternalId> {
    let result = match explicit {
        Some(value) => ExternalId::new(value),
        None => settings.incomplete_consumer_user_id(),
    };
    result.map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid incomplete consumer user id: {error}"),
        )
    })
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url, PLACEMENT_DATABASE_URL or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}
