use serde::Serialize;
use thiserror::Error;

use crate::router::NavigationIntent;

/// StatusCategory
///
/// The normalized failure classes a UI renders differently. `Validation` and
/// `PermissionDenied` never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusCategory {
    Validation,
    PermissionDenied,
    Unauthorized,
    ClientError,
    ServerError,
    Network,
}

/// ApiError
///
/// Every failure a resource client can return. The pipeline has already run
/// its side effects (notification, forced logout) by the time a caller sees
/// one of these; callers only render local state from it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A pre-call guard rejected the call (for example, no session token).
    #[error("{0}")]
    Validation(String),

    /// Role or ownership mismatch detected client-side. Advisory only.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The server answered 401. When the request carried a token the session
    /// has been cleared and `session_expired` is set.
    #[error("{message}")]
    Unauthorized {
        message: String,
        session_expired: bool,
    },

    /// Any other 4xx answer.
    #[error("{message}")]
    ClientError { status: u16, message: String },

    /// 5xx answer.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// No response was received (connect failure, timeout, TLS...).
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but its body did not match the expected payload.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The session changed (login, logout, forced expiry) while the call was
    /// in flight; the response was discarded.
    #[error("response discarded: session changed while the request was in flight")]
    StaleSession,
}

impl ApiError {
    /// Maps the error onto the normalized category shape. Decode failures are
    /// reported as server errors and stale responses as client-side
    /// validation, since neither came from a well-formed server rejection.
    pub fn category(&self) -> StatusCategory {
        match self {
            ApiError::Validation(_) | ApiError::StaleSession => StatusCategory::Validation,
            ApiError::PermissionDenied(_) => StatusCategory::PermissionDenied,
            ApiError::Unauthorized { .. } => StatusCategory::Unauthorized,
            ApiError::ClientError { .. } => StatusCategory::ClientError,
            ApiError::ServerError { .. } | ApiError::Decode(_) => StatusCategory::ServerError,
            ApiError::Network(_) => StatusCategory::Network,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status when the failure came from a server answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::ClientError { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Where the UI should navigate in response to this failure, if anywhere.
    /// Only an expired session forces navigation (to the login view).
    pub fn navigation_intent(&self) -> Option<NavigationIntent> {
        match self {
            ApiError::Unauthorized {
                session_expired: true,
                ..
            } => Some(NavigationIntent::Login),
            _ => None,
        }
    }

    /// True for failures produced by a pre-call guard, i.e. no request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::Validation(_) | ApiError::PermissionDenied(_))
    }

    pub fn login_required() -> Self {
        ApiError::Validation(LOGIN_REQUIRED.to_string())
    }
}

pub const LOGIN_REQUIRED: &str = "please log in first";

/// Normalized error shape handed to UI layers: `{ statusCategory, message }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub status_category: StatusCategory,
    pub message: String,
}

impl From<&ApiError> for ErrorPayload {
    fn from(err: &ApiError) -> Self {
        Self {
            status_category: err.category(),
            message: err.message(),
        }
    }
}

/// StoreError
///
/// Failures of the underlying key-value backend. The credential store logs
/// and absorbs these; they never reach resource-client callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
