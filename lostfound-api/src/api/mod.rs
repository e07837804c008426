//! HTTP API handlers for lostfound-api

pub mod buildinfo;
pub mod claims;
pub mod events;
pub mod health;
pub mod items;

pub use buildinfo::get_build_info;
pub use claims::{claim_routes, create_claim, list_claims, update_claim_status};
pub use events::{event_routes, event_stream};
pub use health::health_routes;
pub use items::{create_item, get_item, item_routes, list_items};

use crate::coordinator::LifecycleError;
use crate::error::ApiError;

/// Map a lifecycle failure to its HTTP form
///
/// `internal_message` is what the client sees for unexpected failures.
pub(crate) fn lifecycle_error(err: LifecycleError, internal_message: &str) -> ApiError {
    match err {
        LifecycleError::ItemNotFound | LifecycleError::ClaimNotFound => {
            ApiError::NotFound(err.to_string())
        }
        LifecycleError::Conflict(msg) => ApiError::Conflict(msg),
        LifecycleError::InvalidStatus(_) => ApiError::BadRequest(err.to_string()),
        LifecycleError::Storage(e) => ApiError::internal(internal_message, e),
    }
}
