//! HTTP client for the session-tracking backend.
//!
//! The backend exposes four GET endpoints under a base URL. Everything here is
//! blocking; callers run it off the UI thread (see [`crate::refresh`]).

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::{GordaError, Result};
use crate::session::{parse_active_interval, parse_sessions, Session};

/// Default backend location.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8090";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const ACTIVE_INTERVAL_PATH: &str = "/active-interval";
pub const INTERVALS_PATH: &str = "/intervals";
pub const START_PATH: &str = "/start";
pub const STOP_PATH: &str = "/stop";

/// Operations the client needs from the backend.
pub trait Backend: Send {
    /// Start time of the running session, or `None` when idle.
    fn active_interval(&self) -> Result<Option<DateTime<Utc>>>;

    /// Full session history.
    fn sessions(&self) -> Result<Vec<Session>>;

    /// Begin a new session.
    fn start(&self) -> Result<()>;

    /// End the running session.
    fn stop(&self) -> Result<()>;
}

/// [`Backend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for `base_url` with the given request timeout.
    ///
    /// System proxies are ignored; the backend is expected on the local machine.
    ///
    /// # Errors
    ///
    /// Returns `GordaError::Config` if the URL does not parse or is not http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .user_agent(format!("gorda/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GordaError::Config(format!("Could not build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GordaError::Config(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// GET `path` and return the body as text.
    fn get(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path)?;
        tracing::debug!(event = "client.request_started", url = %url);

        let response = self.client.get(url).send().map_err(|source| GordaError::Http {
            endpoint: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GordaError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        response.text().map_err(|source| GordaError::Http {
            endpoint: path.to_string(),
            source,
        })
    }
}

impl Backend for HttpBackend {
    fn active_interval(&self) -> Result<Option<DateTime<Utc>>> {
        let body = self.get(ACTIVE_INTERVAL_PATH)?;
        parse_active_interval(&body).map_err(|source| GordaError::Decode {
            endpoint: ACTIVE_INTERVAL_PATH.to_string(),
            source,
        })
    }

    fn sessions(&self) -> Result<Vec<Session>> {
        let body = self.get(INTERVALS_PATH)?;
        parse_sessions(&body).map_err(|source| GordaError::Decode {
            endpoint: INTERVALS_PATH.to_string(),
            source,
        })
    }

    fn start(&self) -> Result<()> {
        self.get(START_PATH).map(|_| ())
    }

    fn stop(&self) -> Result<()> {
        self.get(STOP_PATH).map(|_| ())
    }
}

/// Parse and normalize a backend base URL so relative joins keep any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| GordaError::Config(format!("Invalid backend URL '{}': {}", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(GordaError::Config(format!(
            "Backend URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
