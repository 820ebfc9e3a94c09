/// In-memory [`Transport`] that records every request.
///
/// Used by the unit and integration tests to drive the poller and the
/// command dispatcher without a live odin-control server. GET responses are
/// canned per path; PUTs succeed with `{}` unless a failure was registered
/// for that path.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use super::error::ApiError;
use super::transport::Transport;

/// One request seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

impl Recorded {
    pub fn get(path: &str) -> Self {
        Self {
            method: "GET",
            path: path.to_string(),
            body: None,
        }
    }

    pub fn put(path: &str, body: Option<Value>) -> Self {
        Self {
            method: "PUT",
            path: path.to_string(),
            body,
        }
    }
}

#[derive(Default)]
struct Inner {
    requests: Vec<Recorded>,
    get_responses: HashMap<String, Result<Value, ApiError>>,
    put_failures: HashMap<String, ApiError>,
}

#[derive(Default)]
pub struct RecordingTransport {
    inner: Mutex<Inner>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GETs on `path` with `value`.
    pub fn respond_get(&self, path: &str, value: Value) {
        self.lock().get_responses.insert(path.to_string(), Ok(value));
    }

    /// Fail GETs on `path` with `error`.
    pub fn fail_get(&self, path: &str, error: ApiError) {
        self.lock().get_responses.insert(path.to_string(), Err(error));
    }

    /// Fail PUTs on `path` with `error`.
    pub fn fail_put(&self, path: &str, error: ApiError) {
        self.lock().put_failures.insert(path.to_string(), error);
    }

    /// Every request so far, in issue order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    /// Only the PUT requests, in issue order.
    pub fn puts(&self) -> Vec<Recorded> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == "PUT")
            .cloned()
            .collect()
    }

    /// Forget recorded requests (canned responses are kept).
    pub fn clear(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn get(&self, path: &str) -> Result<Value, ApiError> {
        let mut inner = self.lock();
        inner.requests.push(Recorded::get(path));
        inner
            .get_responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Status {
                    status: 404,
                    message: format!("no canned response for {path}"),
                })
            })
    }

    fn put(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let mut inner = self.lock();
        inner.requests.push(Recorded::put(path, body.cloned()));
        match inner.put_failures.get(path) {
            Some(err) => Err(err.clone()),
            None => Ok(json!({})),
        }
    }
}
