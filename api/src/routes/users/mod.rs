//! User route handlers
//!
//! `/me` and `/update_me` serve the authenticated caller's own record;
//! the remaining endpoints are the admin-only generic CRUD surface.

pub mod create;
pub mod delete;
pub mod get_one;
pub mod list;
pub mod me;
pub mod update;
pub mod update_me;

use uuid::Uuid;

use cl_core::errors::DomainError;

use crate::handlers::ApiError;

/// Parse a path identifier, reporting malformed values as a 400
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError(DomainError::InvalidId {
            value: raw.to_string(),
        })
    })
}
