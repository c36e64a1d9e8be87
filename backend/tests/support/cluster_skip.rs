//! Helpers for controlling embedded test cluster behaviour.
//!
//! Integration tests that depend on embedded PostgreSQL fail when the cluster
//! cannot be started. Setting `SKIP_TEST_CLUSTER` opts out and turns a failed
//! bootstrap into a skip for environments that cannot host the cluster.

/// Returns true when the `SKIP_TEST_CLUSTER` environment variable is set to a
/// truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently across integration tests.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns `None`.
/// Otherwise, panics with the failure reason so a broken bootstrap is reported
/// as a failing test.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the cluster skip policy.

    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    fn panic_message(value: Option<&str>) -> Option<String> {
        let _guard = lock_env([("SKIP_TEST_CLUSTER", value.map(str::to_owned))]);
        std::panic::catch_unwind(|| {
            let _: Option<()> = handle_cluster_setup_failure("bootstrap refused");
        })
        .err()
        .and_then(|payload| payload.downcast::<String>().ok().map(|message| *message))
    }

    #[rstest]
    #[case(None)]
    #[case(Some("0"))]
    #[case(Some("false"))]
    fn setup_failure_panics_without_opt_out(#[case] value: Option<&str>) {
        let message = panic_message(value).expect("bootstrap failure must panic");
        assert!(message.contains("Test cluster setup failed: bootstrap refused"));
        assert!(message.contains("SKIP_TEST_CLUSTER=1"));
    }

    #[rstest]
    #[case("1")]
    #[case("true")]
    #[case("YES")]
    fn truthy_opt_out_skips(#[case] value: &str) {
        let _guard = lock_env([("SKIP_TEST_CLUSTER", Some(value.to_owned()))]);
        let outcome: Option<()> = handle_cluster_setup_failure("bootstrap refused");
        assert!(outcome.is_none());
    }
}
