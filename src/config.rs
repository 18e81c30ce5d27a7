//! Configuration types for imgbatch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};
use utoipa::ToSchema;

/// Processing backend configuration
///
/// Used by [`HttpProcessor`](crate::processor::HttpProcessor) to reach the
/// image-processing endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessingConfig {
    /// Endpoint that receives `multipart/form-data` uploads
    /// (default: "http://localhost:8000/api/process")
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Per-request timeout in seconds (None = wait indefinitely)
    ///
    /// Without a timeout a backend that never answers leaves the item in
    /// `loading` until it is removed.
    #[serde(default, with = "optional_duration_serde")]
    #[schema(value_type = Option<u64>)]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every upload
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ProcessingConfig {
    /// Parse and check the endpoint URL
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] keyed on `endpoint_url` when the value is not
    /// an absolute `http` or `https` URL.
    pub fn endpoint(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.endpoint_url).map_err(|e| Error::Config {
            message: format!("invalid endpoint URL '{}': {}", self.endpoint_url, e),
            key: Some("endpoint_url".to_string()),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::Config {
                message: format!(
                    "endpoint URL must use http or https, got '{}'",
                    scheme
                ),
                key: Some("endpoint_url".to_string()),
            }),
        }
    }
}

/// Submission manager configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionConfig {
    /// Capacity of the event broadcast channel (default: 1000)
    ///
    /// Subscribers that fall further behind than this miss events and see a
    /// lag notification instead.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6789)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Maximum accepted request body for uploads in bytes (default: 25 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Main configuration for [`SubmissionManager`](crate::SubmissionManager)
///
/// Fields are organized into sub-configs:
/// - [`processing`](ProcessingConfig) - backend endpoint and HTTP client
/// - [`submission`](SubmissionConfig) - manager internals
/// - [`server`](ServerIntegrationConfig) - REST API (flattened, so `api` is a
///   top-level key in JSON)
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Processing backend settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Submission manager settings
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// API and external server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their defaults. The result is validated before it
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read,
    /// [`Error::Serialization`] if it is not valid JSON for this schema, and
    /// [`Error::Config`] if validation fails.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Check settings that serde cannot
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        self.processing.endpoint()?;

        if self.submission.event_channel_capacity == 0 {
            return Err(Error::Config {
                message: "event channel capacity must be greater than zero".to_string(),
                key: Some("event_channel_capacity".to_string()),
            });
        }

        if self.server.api.max_upload_bytes == 0 {
            return Err(Error::Config {
                message: "maximum upload size must be greater than zero".to_string(),
                key: Some("max_upload_bytes".to_string()),
            });
        }

        Ok(())
    }
}

// Default value functions
fn default_endpoint_url() -> String {
    "http://localhost:8000/api/process".to_string()
}

fn default_user_agent() -> String {
    format!("imgbatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6789))
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").expect("{} must deserialize");

        assert_eq!(
            config.processing.endpoint_url,
            "http://localhost:8000/api/process"
        );
        assert!(config.processing.request_timeout.is_none());
        assert_eq!(config.submission.event_channel_capacity, 1000);
        assert_eq!(
            config.server.api.bind_address,
            "127.0.0.1:6789".parse().unwrap()
        );
        assert!(config.server.api.cors_enabled);
        assert_eq!(config.server.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.server.api.max_upload_bytes, 25 * 1024 * 1024);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let json = r#"{
            "processing": { "endpoint_url": "https://img.example.com/process", "request_timeout": 30 },
            "api": { "swagger_ui": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.processing.endpoint_url,
            "https://img.example.com/process"
        );
        assert_eq!(
            config.processing.request_timeout,
            Some(Duration::from_secs(30))
        );
        assert!(!config.server.api.swagger_ui);
        assert!(config.server.api.cors_enabled, "untouched field keeps default");
        assert!(config.processing.user_agent.starts_with("imgbatch/"));
    }

    #[test]
    fn config_default_survives_json_round_trip() {
        let original = Config {
            processing: ProcessingConfig {
                request_timeout: Some(Duration::from_secs(12)),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_string(&original).expect("Config must serialize to JSON");
        let restored: Config =
            serde_json::from_str(&json).expect("Config must deserialize from its own JSON");

        assert_eq!(restored.processing.endpoint_url, original.processing.endpoint_url);
        assert_eq!(
            restored.processing.request_timeout,
            original.processing.request_timeout
        );
        assert_eq!(
            restored.submission.event_channel_capacity,
            original.submission.event_channel_capacity
        );
        assert_eq!(
            restored.server.api.bind_address,
            original.server.api.bind_address
        );
    }

    #[test]
    fn request_timeout_serializes_as_seconds_or_null() {
        let mut processing = ProcessingConfig {
            request_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&processing).unwrap()["request_timeout"], 5);

        processing.request_timeout = None;
        assert!(serde_json::to_value(&processing).unwrap()["request_timeout"].is_null());
    }

    #[test]
    fn request_timeout_rejects_string() {
        let result: std::result::Result<ProcessingConfig, _> =
            serde_json::from_str(r#"{"request_timeout":"30s"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let mut config = Config::default();
        config.processing.endpoint_url = "file:///tmp/socket".into();

        let err = config.validate().unwrap_err();

        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("endpoint_url")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_unparseable_endpoint() {
        let mut config = Config::default();
        config.processing.endpoint_url = "not a url".into();

        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn validate_rejects_zero_channel_capacity() {
        let mut config = Config::default();
        config.submission.event_channel_capacity = 0;

        match config.validate().unwrap_err() {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("event_channel_capacity"))
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn from_json_file_loads_and_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"processing":{{"endpoint_url":"http://10.0.0.2:9000/run"}}}}"#
        )
        .unwrap();

        let config = Config::from_json_file(file.path()).unwrap();

        assert_eq!(config.processing.endpoint_url, "http://10.0.0.2:9000/run");
    }

    #[test]
    fn from_json_file_reports_io_serialization_and_validation_errors() {
        let missing = Config::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, Error::Io(_)));

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "{{ not json").unwrap();
        assert!(matches!(
            Config::from_json_file(garbage.path()).unwrap_err(),
            Error::Serialization(_)
        ));

        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        write!(invalid, r#"{{"submission":{{"event_channel_capacity":0}}}}"#).unwrap();
        assert!(matches!(
            Config::from_json_file(invalid.path()).unwrap_err(),
            Error::Config { .. }
        ));
    }
}
