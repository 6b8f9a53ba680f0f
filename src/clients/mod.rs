//! Resource Clients
//!
//! One module per backend resource. Every operation is a declarative
//! (method, path, payload) triple handed to the request pipeline, optionally
//! preceded by one of the shared pre-call guards below. A guard failure
//! returns immediately and never reaches the network.

pub mod admin;
pub mod ai;
pub mod comment;
pub mod course;
pub mod home;
pub mod note;
pub mod search;
pub mod user;

use crate::auth::RolePolicy;
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::notify::Notice;
use crate::pipeline::{GENERIC_ERROR_MESSAGE, RequestPipeline};
use crate::session::Session;

/// Auth-required guard: a session token must be present.
pub(crate) fn require_token(session: &Session) -> Result<(), ApiError> {
    match session.get_token() {
        Some(_) => Ok(()),
        None => Err(ApiError::login_required()),
    }
}

/// Manage-permission guard: teacher or admin.
pub(crate) fn require_manage_permission(session: &Session, action: &str) -> Result<(), ApiError> {
    if RolePolicy::new(session).has_manage_permission() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(format!(
            "only teachers and admins can {}",
            action
        )))
    }
}

pub(crate) fn require_admin(session: &Session, action: &str) -> Result<(), ApiError> {
    if RolePolicy::new(session).is_admin() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(format!("only admins can {}", action)))
    }
}

/// Ownership guard. Without an owner id the check is skipped and the server
/// decides.
pub(crate) fn require_owner_or_admin(
    session: &Session,
    owner_id: Option<u64>,
    action: &str,
) -> Result<(), ApiError> {
    match owner_id {
        Some(owner) if !RolePolicy::new(session).is_owner_or_admin(owner) => {
            Err(ApiError::PermissionDenied(format!(
                "you can only {} your own content unless you are an admin",
                action
            )))
        }
        _ => Ok(()),
    }
}

/// Identity check for profiles headed into the session cache. A 200 whose
/// body lacks a user id (blank body, wrong envelope, proxy page) decodes to a
/// default profile and must not replace the signed-in identity.
pub(crate) fn require_identity(
    pipeline: &RequestPipeline,
    user: &UserProfile,
) -> Result<(), ApiError> {
    if user.id != 0 {
        return Ok(());
    }
    tracing::warn!("profile response carried no user id; cached profile kept");
    pipeline.notifier().notify(Notice::error(GENERIC_ERROR_MESSAGE));
    Err(ApiError::Decode("profile response carried no user id".to_string()))
}
