/// HTTP transport for the control server.
///
/// The [`Transport`] trait is the seam between the typed [`ApiClient`]
/// (`super::ApiClient`) and the wire. Production code uses
/// [`HttpTransport`], a thin wrapper over a synchronous `ureq` agent; tests
/// substitute a recording fake.
use std::time::Duration;

use serde_json::Value;

use super::error::{ApiError, error_message};

/// Minimal request surface the dashboard needs: JSON GET and JSON PUT.
///
/// `path` is absolute on the server (e.g. `/api/0.1/aravis`).
pub trait Transport: Send + Sync {
    /// Issue a GET and parse the body as JSON.
    fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Issue a PUT with an optional JSON body and parse the reply as JSON.
    fn put(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError>;
}

/// `ureq`-backed transport.
#[derive(Debug)]
pub struct HttpTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Build a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        // "localhost" may resolve to ::1 first while odin-control binds IPv4 only.
        let base_url = base_url
            .trim_end_matches('/')
            .replace("://localhost", "://127.0.0.1");
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url, agent }
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        let result = self
            .agent
            .get(&self.url(path))
            .set("Accept", "application/json")
            .call();
        read_json(result)
    }

    fn put(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self
            .agent
            .put(&self.url(path))
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");

        let result = match body {
            Some(value) => request.send_string(&value.to_string()),
            None => request.call(),
        };
        read_json(result)
    }
}

/// Turn a `ureq` outcome into parsed JSON or an [`ApiError`].
///
/// An empty 2xx body is reported as `Value::Null`.
fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<Value, ApiError> {
    match result {
        Ok(resp) => {
            let text = resp
                .into_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        }
        Err(ureq::Error::Status(status, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(ApiError::Status {
                status,
                message: error_message(&body),
            })
        }
        Err(ureq::Error::Transport(t)) => Err(ApiError::Transport(t.to_string())),
    }
}
