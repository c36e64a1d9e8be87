//! Placement user identity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`ExternalId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalIdValidationError {
    /// The value is empty or only whitespace.
    Empty,
    /// The value is wider than the `external_id` column.
    TooLong { max: usize },
    /// The value contains a NUL character, which PostgreSQL text cannot store.
    ContainsNul,
}

impl fmt::Display for ExternalIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "external id must not be empty"),
            Self::TooLong { max } => write!(f, "external id must be at most {max} characters"),
            Self::ContainsNul => write!(f, "external id must not contain NUL characters"),
        }
    }
}

impl std::error::Error for ExternalIdValidationError {}

/// Maximum length of an external identifier, matching the column width.
pub const EXTERNAL_ID_MAX: usize = 255;

/// Caller-supplied identifier for a user, unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    /// Validate and construct an [`ExternalId`].
    pub fn new(external_id: impl Into<String>) -> Result<Self, ExternalIdValidationError> {
        Self::from_owned(external_id.into())
    }

    fn from_owned(external_id: String) -> Result<Self, ExternalIdValidationError> {
        if external_id.trim().is_empty() {
            return Err(ExternalIdValidationError::Empty);
        }
        if external_id.chars().count() > EXTERNAL_ID_MAX {
            return Err(ExternalIdValidationError::TooLong {
                max: EXTERNAL_ID_MAX,
            });
        }
        if external_id.contains('\0') {
            return Err(ExternalIdValidationError::ContainsNul);
        }
        Ok(Self(external_id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ExternalId> for String {
    fn from(value: ExternalId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalId {
    type Error = ExternalIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Database-assigned surrogate key of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserKey(i32);

impl UserKey {
    /// Wrap a key read back from storage.
    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    /// Access the underlying integer key.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    external_id: ExternalId,
}

impl NewUser {
    /// Prepare a user for insertion.
    pub fn new(external_id: ExternalId) -> Self {
        Self { external_id }
    }

    /// External id the row will be stored under.
    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }
}

/// A user hydrated from a persisted row.
///
/// ## Invariants
/// - `id` was assigned by storage and is never changed afterwards.
/// - Outside this crate, values are only produced by repository reads or
///   inserts; `User::hydrate` is crate-private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserKey,
    external_id: ExternalId,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Populate a [`User`] from the columns of a stored row.
    pub(crate) fn hydrate(
        id: UserKey,
        external_id: ExternalId,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            external_id,
            created_at,
            updated_at,
        }
    }

    /// Surrogate key assigned by storage.
    pub fn id(&self) -> UserKey {
        self.id
    }

    /// Caller-supplied identifier.
    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    /// Time the row was inserted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time; `None` until the row is first updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
