//! Bootstraps embedded PostgreSQL for integration tests.
//!
//! `pg-embed-setup-unpriv` installs binaries and data under `/var/tmp` unless
//! `PG_RUNTIME_DIR` and `PG_DATA_DIR` say otherwise. Sandboxed runners often
//! cannot write there, so when either variable is missing both are pointed at
//! a unique directory below the cargo target directory for the duration of
//! the bootstrap. Environment mutation is serialised across parallel tests.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Retries after the first attempt for transient download failures.
const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles on each subsequent one.
const RETRY_DELAY_MS: u64 = 500;

const TRANSIENT_PATTERNS: [&str; 7] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "temporarily unavailable",
    "dns error",
    "failed to lookup",
];

fn target_dir() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("target")
        },
        PathBuf::from,
    )
}

fn scratch_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let base = target_dir()
        .join("pg-embed")
        .join(format!("users-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

fn is_transient(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// Start a [`TestCluster`], retrying transient bootstrap failures.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap_guard = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();

    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) = scratch_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            (
                "PG_RUNTIME_DIR",
                Some(runtime_dir.to_string_lossy().into_owned()),
            ),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS << attempt);
                eprintln!(
                    "pg-embed: attempt {}/{} failed, retrying in {delay:?}: {last_error}",
                    attempt + 1,
                    MAX_RETRIES + 1,
                );
                std::thread::sleep(delay);
            }
        }
    }

    Err(last_error)
}
