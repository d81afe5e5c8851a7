//! Endpoint descriptors and the YAML endpoint file loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validation::{ConfigError, expand_env_vars};

/// HTTP method for probe requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(()),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|()| {
            format!(
                "invalid method '{}', expected GET/POST/PUT/PATCH/DELETE/HEAD/OPTIONS",
                value
            )
        })
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl HttpMethod {
    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Convert to the HTTP client's method type.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single probe target.
///
/// Built once at start-up and shared read-only across every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Optional human-readable label, used only in logs.
    #[serde(default)]
    pub name: Option<String>,
    /// Absolute target URL (HTTP or HTTPS).
    pub url: String,
    /// HTTP method (default: GET).
    #[serde(default)]
    pub method: HttpMethod,
    /// Request headers, values may reference `${ENV_VARS}`.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// JSON request body; no body is sent when absent.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl EndpointDescriptor {
    /// Create a GET descriptor for `url` with no headers and no body.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
            method: HttpMethod::default(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set the label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a single request header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the JSON request body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Label for logs: the name when set, otherwise the URL.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Validate URL and headers.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` naming the offending endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.url).map_err(|e| {
            ConfigError::validation(format!("endpoint '{}': invalid URL: {}", self.label(), e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "endpoint '{}': unsupported scheme '{}', expected http or https",
                self.label(),
                url.scheme()
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::validation(format!(
                "endpoint '{}': URL has no host",
                self.label()
            )));
        }

        for (key, value) in &self.headers {
            reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ConfigError::validation(format!(
                    "endpoint '{}': invalid header name '{}'",
                    self.label(),
                    key
                ))
            })?;
            reqwest::header::HeaderValue::from_str(value).map_err(|_| {
                ConfigError::validation(format!(
                    "endpoint '{}': invalid value for header '{}'",
                    self.label(),
                    key
                ))
            })?;
        }

        Ok(())
    }
}

/// Ordered list of endpoint descriptors loaded from a YAML file.
///
/// The file is a top-level sequence:
///
/// ```yaml
/// - name: index
///   url: https://example.com/
/// - name: create
///   url: https://example.com/body
///   method: POST
///   headers:
///     content-type: application/json
///   body: {"foo": "bar"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointsConfig {
    pub endpoints: Vec<EndpointDescriptor>,
}

impl EndpointsConfig {
    /// Load, expand and validate an endpoint file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading endpoint config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse, expand and validate endpoint YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.expand_headers()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every descriptor.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` for an empty list or any invalid descriptor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::validation("no endpoints configured"));
        }

        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }

        Ok(())
    }

    /// Number of configured endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether no endpoints are configured.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Consume into the ordered descriptor list.
    pub fn into_endpoints(self) -> Vec<EndpointDescriptor> {
        self.endpoints
    }

    fn expand_headers(&mut self) -> Result<(), ConfigError> {
        for endpoint in &mut self.endpoints {
            let label = endpoint.label().to_string();
            for (key, value) in endpoint.headers.iter_mut() {
                *value = expand_env_vars(value).map_err(|e| {
                    ConfigError::validation(format!("endpoint '{}': header '{}': {}", label, key, e))
                })?;
            }
        }
        Ok(())
    }
}
