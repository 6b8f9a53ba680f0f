use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// RequestBody
///
/// The payload shapes the backend accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// A single-file multipart form (avatar upload).
    Multipart {
        field: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// ApiRequest
///
/// A declarative description of one call: method, path relative to the API
/// base, query, headers, body. Header names keep the exact case they were
/// inserted with.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("invalid request payload: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Flattens a serializable struct into query pairs. `None` fields are
    /// skipped; scalars are rendered as plain strings.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::Validation(format!("invalid query parameters: {}", e)))?;
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    if let Some(rendered) = render_query_value(&value) {
                        self.query.push((key, rendered));
                    }
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(ApiError::Validation(format!(
                "query parameters must be an object, got {}",
                other
            ))),
        }
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn multipart(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.body = RequestBody::Multipart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        };
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn render_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// RawResponse
///
/// What the transport hands back: status and raw body. Only the pipeline
/// looks at this; resource clients receive the decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connect error, timeout, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// 1. Transport Contract
/// Transport
///
/// Moves one fully prepared request over the wire. The pipeline owns every
/// policy decision; a transport only sends.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

/// TransportState
///
/// Shared handle to whichever transport the client was built with.
pub type TransportState = Arc<dyn Transport>;

// 2. The Real Implementation (reqwest)
/// ReqwestTransport
///
/// HTTP(S) transport with the configured fixed timeout. Header names are sent
/// title-cased on HTTP/1 so the `Token` header reaches the server exactly as
/// spelled.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .http1_title_case_headers()
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.config.url_for(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart {
                field,
                file_name,
                mime,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)
                    .map_err(|e| TransportError(format!("invalid upload mime type: {}", e)))?;
                builder.multipart(reqwest::multipart::Form::new().part(field, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// 3. The Mock Implementation (tests)
type SendHook = Box<dyn Fn(&ApiRequest) + Send + Sync>;

/// MockTransport
///
/// Records every request it is asked to send and replays queued responses in
/// order. With nothing queued it answers `200 {}`. A hook runs while the
/// request is "in flight", which lets tests mutate the session mid-call.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    hook: Mutex<Option<SendHook>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.responses
            .lock()
            .push_back(Ok(RawResponse::json(status, body)));
        self
    }

    pub fn fail(&self, reason: &str) -> &Self {
        self.responses
            .lock()
            .push_back(Err(TransportError(reason.to_string())));
        self
    }

    pub fn on_send(&self, hook: impl Fn(&ApiRequest) + Send + Sync + 'static) {
        *self.hook.lock() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(hook) = self.hook.lock().as_ref() {
            hook(&request);
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::json(200, Value::Object(Default::default()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteFilter;

    #[test]
    fn query_skips_absent_fields() {
        let filter = NoteFilter {
            course_id: Some(3),
            page: Some(2),
            ..Default::default()
        };
        let request = ApiRequest::get("/notes").query(&filter).unwrap();
        assert_eq!(request.query_value("course_id"), Some("3"));
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("status"), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = ApiRequest::get("/x").header("Token", "abc");
        assert_eq!(request.header_value("token"), Some("abc"));
    }

    #[tokio::test]
    async fn mock_replays_in_order_then_defaults() {
        let mock = MockTransport::new();
        mock.respond(201, serde_json::json!({"id": 1})).fail("down");

        let first = mock.send(ApiRequest::get("/a")).await.unwrap();
        assert_eq!(first.status, 201);
        assert!(mock.send(ApiRequest::get("/b")).await.is_err());
        let third = mock.send(ApiRequest::get("/c")).await.unwrap();
        assert_eq!(third.status, 200);
        assert_eq!(mock.request_count(), 3);
    }
}
