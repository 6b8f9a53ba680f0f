use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::notify::{Notice, NotifierState};
use crate::session::SessionState;
use crate::transport::{ApiRequest, RawResponse, TransportState};

/// Header carrying the session token. Fixed by the server contract; this is
/// not a bearer scheme.
pub const TOKEN_HEADER: &str = "Token";
/// Legacy credential header that must never travel alongside `Token`.
pub const LEGACY_AUTH_HEADER: &str = "Authorization";
/// Correlation id attached to every outbound request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const SESSION_EXPIRED_MESSAGE: &str = "session expired, please log in again";
pub const NETWORK_ERROR_MESSAGE: &str = "network error, please check your connection";
pub const GENERIC_ERROR_MESSAGE: &str = "request failed";

/// Body fields searched, in order, for a server-provided error message.
pub const MESSAGE_FIELDS: [&str; 4] = ["error", "message", "msg", "detail"];

/// RequestPipeline
///
/// The one place that knows about credentials and error presentation. Every
/// resource call goes through [`RequestPipeline::execute`]:
///
/// 1. Outbound: strip any conflicting credential headers, attach `Token` from
///    the session, tag the request with an `x-request-id`.
/// 2. Send through the transport, remembering the session epoch.
/// 3. Inbound: discard the answer if the session changed meanwhile; otherwise
///    decode the payload on success, or classify the failure, run its side
///    effects (notification, forced logout on 401) and return it.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: TransportState,
    session: SessionState,
    notifier: NotifierState,
}

impl RequestPipeline {
    pub fn new(transport: TransportState, session: SessionState, notifier: NotifierState) -> Self {
        Self {
            transport,
            session,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn notifier(&self) -> &NotifierState {
        &self.notifier
    }

    /// Outbound interceptor. The session is the only source of credentials:
    /// whatever auth headers the caller put on the request are dropped first.
    pub fn prepare(&self, mut request: ApiRequest) -> ApiRequest {
        request.headers.retain(|(name, _)| {
            !name.eq_ignore_ascii_case(TOKEN_HEADER) && !name.eq_ignore_ascii_case(LEGACY_AUTH_HEADER)
        });
        if let Some(token) = self.session.get_token() {
            request.headers.push((TOKEN_HEADER.to_string(), token));
        }
        if request.header_value(REQUEST_ID_HEADER).is_none() {
            request
                .headers
                .push((REQUEST_ID_HEADER.to_string(), Uuid::new_v4().to_string()));
        }
        request
    }

    /// Sends `request` and decodes the payload as `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        self.decode(&response)
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let request = self.prepare(request);
        let epoch = self.session.epoch();
        let carried_token = request.header_value(TOKEN_HEADER).is_some();
        let method = request.method.clone();
        let path = request.path.clone();
        let request_id = request
            .header_value(REQUEST_ID_HEADER)
            .unwrap_or_default()
            .to_string();

        tracing::debug!(%method, %path, req_id = %request_id, authenticated = carried_token, "sending request");

        let outcome = self.transport.send(request).await;

        if self.session.epoch() != epoch {
            tracing::debug!(%method, %path, req_id = %request_id, "session changed in flight, discarding response");
            return Err(ApiError::StaleSession);
        }

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %path, req_id = %request_id, "no response: {}", e);
                self.notifier.notify(Notice::error(NETWORK_ERROR_MESSAGE));
                return Err(ApiError::Network(e.0));
            }
        };

        tracing::debug!(%method, %path, req_id = %request_id, status = response.status, "response received");

        if response.is_success() {
            return Ok(response);
        }
        Err(self.reject(&response, carried_token))
    }

    /// Inbound failure interceptor: classify, run side effects, hand back the
    /// error for the caller to propagate.
    fn reject(&self, response: &RawResponse, carried_token: bool) -> ApiError {
        let server_message = extract_message(&response.body);

        if response.status == 401 {
            // A profile cached without a token must not outlive a rejection.
            self.session.clear_session();
            if carried_token {
                self.notifier.notify(Notice::error(SESSION_EXPIRED_MESSAGE));
                return ApiError::Unauthorized {
                    message: SESSION_EXPIRED_MESSAGE.to_string(),
                    session_expired: true,
                };
            }
            // No credential was presented (e.g. a failed login): nothing
            // expired, so show the server's reason instead.
            let message = server_message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            self.notifier.notify(Notice::error(message.clone()));
            return ApiError::Unauthorized {
                message,
                session_expired: false,
            };
        }

        let message = server_message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        self.notifier.notify(Notice::error(message.clone()));
        if response.status >= 500 {
            ApiError::ServerError {
                status: response.status,
                message,
            }
        } else {
            ApiError::ClientError {
                status: response.status,
                message,
            }
        }
    }

    /// Inbound success interceptor: the caller only ever sees the payload.
    fn decode<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T, ApiError> {
        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &response.body
        };
        serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(status = response.status, "unexpected response body: {}", e);
            self.notifier.notify(Notice::error(GENERIC_ERROR_MESSAGE));
            ApiError::Decode(e.to_string())
        })
    }
}

/// First non-empty string among [`MESSAGE_FIELDS`] in a JSON object body.
pub fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;
    MESSAGE_FIELDS.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
