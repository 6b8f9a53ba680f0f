use std::{env, path::PathBuf, time::Duration};

/// ClientConfig
///
/// Holds the client's entire configuration state. Loaded once at startup and
/// cloned into the pipeline; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    // Base URL every request path is appended to, including the `/api/v1` prefix.
    pub api_base_url: String,
    // Fixed per-request timeout applied by the transport.
    pub timeout: Duration,
    // Location of the persisted session file (token + cached profile).
    pub store_path: PathBuf,
    // Runtime environment marker. Selects log format and fail-fast behaviour.
    pub env: Env,
}

/// Env
///
/// Runtime context: local development against a backend on localhost, or a
/// deployed production backend that must be configured explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORE_PATH: &str = ".noteshare/session.json";

impl Default for ClientConfig {
    /// default
    ///
    /// Non-panicking configuration for tests and embedding, pointing at the
    /// local development backend.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            env: Env::Local,
        }
    }
}

impl ClientConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `NOTESHARE_API_URL` is missing, so a
    /// deployed client never silently talks to localhost.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("NOTESHARE_API_URL")
                .expect("FATAL: NOTESHARE_API_URL must be set in production."),
            Env::Local => env::var("NOTESHARE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        };

        // A malformed value falls back to the default rather than aborting startup.
        let timeout_secs = env::var("NOTESHARE_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let store_path = env::var("NOTESHARE_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            store_path,
            env,
        }
    }

    /// Joins a resource path onto the configured base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}
