//! Domain primitives, ports and services.
//!
//! Purpose: Define the placement user identity and the operations over it
//! without any knowledge of the storage engine. Adapters under
//! `crate::outbound` implement the ports declared in [`ports`].
//!
//! Public surface:
//! - User / NewUser — hydrated and transient user values.
//! - ExternalId / UserKey — caller identifier and surrogate key.
//! - UserService — lookup, create and sentinel provisioning.

pub mod ports;
pub mod user;
mod user_service;

pub use self::user::{EXTERNAL_ID_MAX, ExternalId, ExternalIdValidationError, NewUser, User, UserKey};
pub use self::user_service::UserService;
