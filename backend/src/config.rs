//! Placement user settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{ExternalId, ExternalIdValidationError};
use crate::outbound::persistence::PoolConfig;

/// External identifier of the placeholder user recorded for consumers whose
/// owning user is not known.
pub const DEFAULT_INCOMPLETE_CONSUMER_USER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Configuration values for the user persistence layer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLACEMENT")]
pub struct PlacementSettings {
    /// External id of the incomplete consumer user.
    pub incomplete_consumer_user_id: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

impl PlacementSettings {
    /// Return the sentinel external id, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an [`ExternalIdValidationError`] when the configured value is
    /// blank or wider than the `external_id` column.
    pub fn incomplete_consumer_user_id(&self) -> Result<ExternalId, ExternalIdValidationError> {
        ExternalId::new(
            self.incomplete_consumer_user_id
                .as_deref()
                .unwrap_or(DEFAULT_INCOMPLETE_CONSUMER_USER_ID),
        )
    }

    /// Build a pool configuration for `database_url` using the configured
    /// pool size.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        PoolConfig::new(database_url).with_max_size(self.pool_max_size)
    }
}
