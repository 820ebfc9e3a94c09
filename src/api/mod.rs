/// Client for the odin-control REST API.
///
/// All endpoints live under `/api/{version}/`; the one exception is the
/// version lookup at `/api`. GET helpers return typed records from
/// [`types`], PUT helpers return the server's JSON reply.
///
/// | Helper                     | Request                                   |
/// |----------------------------|-------------------------------------------|
/// | `api_version`              | `GET /api`                                |
/// | `adapters`                 | `GET /api/{v}/adapters/`                  |
/// | `acquisition`              | `GET /api/{v}/aravis`                     |
/// | `system`                   | `GET /api/{v}/sys`                        |
/// | `writer_status`            | `GET /api/{v}/fp/status/`                 |
/// | `set_acquisition_config`   | `PUT /api/{v}/aravis/config/{field}`      |
/// | `set_writer_config`        | `PUT /api/{v}/fp/config/{path}`           |
/// | `writer_command`           | `PUT /api/{v}/fp/command/{name}`          |
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod error;
pub mod mode;
pub mod recording;
pub mod transport;
pub mod types;

pub use error::ApiError;
pub use mode::AcquisitionMode;
pub use transport::{HttpTransport, Transport};

use crate::config::schema::ServerConfig;
use types::{AdapterList, ApiVersion, AravisSnapshot, SystemInfo, WriterStatus, WriterStatusList};

/// Cheaply cloneable handle on the control server.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    version: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, version: impl Into<String>) -> Self {
        Self {
            transport,
            version: version.into(),
        }
    }

    /// Build an HTTP client from the resolved `[server]` config.
    pub fn from_config(config: &ServerConfig) -> Self {
        let transport = HttpTransport::new(&config.url, Duration::from_millis(config.timeout_ms));
        Self::new(Arc::new(transport), config.api_version.clone())
    }

    /// API version used in request paths.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Absolute server path for an endpoint under the versioned prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!("/api/{}/{}", self.version, path.trim_start_matches('/'))
    }

    // -- Typed reads --

    pub fn api_version(&self) -> Result<ApiVersion, ApiError> {
        self.get_typed("/api")
    }

    pub fn adapters(&self) -> Result<AdapterList, ApiError> {
        self.get_typed(&self.endpoint("adapters/"))
    }

    pub fn acquisition(&self) -> Result<AravisSnapshot, ApiError> {
        self.get_typed(&self.endpoint("aravis"))
    }

    pub fn system(&self) -> Result<SystemInfo, ApiError> {
        self.get_typed(&self.endpoint("sys"))
    }

    pub fn writer_status(&self) -> Result<Vec<WriterStatus>, ApiError> {
        let list: WriterStatusList = self.get_typed(&self.endpoint("fp/status/"))?;
        Ok(list.value)
    }

    // -- Writes --

    /// `PUT aravis/config/{field}` with a raw JSON scalar body.
    pub fn set_acquisition_config(&self, field: &str, value: &Value) -> Result<Value, ApiError> {
        self.transport
            .put(&self.endpoint(&format!("aravis/config/{field}")), Some(value))
    }

    /// `PUT fp/config/{path}` with a scalar or string body.
    pub fn set_writer_config(&self, path: &str, value: &Value) -> Result<Value, ApiError> {
        self.transport
            .put(&self.endpoint(&format!("fp/config/{path}")), Some(value))
    }

    /// `PUT fp/command/{name}` with no body.
    pub fn writer_command(&self, name: &str) -> Result<Value, ApiError> {
        self.transport
            .put(&self.endpoint(&format!("fp/command/{name}")), None)
    }

    // -- Raw access (CLI) --

    /// GET any path under the versioned prefix.
    pub fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        self.transport.get(&self.endpoint(path))
    }

    /// PUT any path under the versioned prefix.
    pub fn put_value(&self, path: &str, value: &Value) -> Result<Value, ApiError> {
        self.transport.put(&self.endpoint(path), Some(value))
    }

    fn get_typed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.transport.get(path)?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }
}
