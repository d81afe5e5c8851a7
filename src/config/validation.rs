//! Configuration error type and load-time value expansion.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Configuration error types.
///
/// Every variant is fatal: the monitor refuses to start on any of them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the endpoint file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint file is not valid YAML or has the wrong shape.
    #[error("failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Endpoint file parsed but contains invalid values.
    #[error("config validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

fn env_var_regex() -> &'static Regex {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var pattern is a valid regex")
    })
}

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration value.
///
/// A reference to an unset variable without a default is rejected, so a
/// missing secret fails at start-up instead of sending an empty header.
///
/// # Examples
///
/// ```
/// use vigil::config::expand_env_vars;
///
/// let value = expand_env_vars("Bearer ${VIGIL_DOC_UNSET_TOKEN:-anonymous}").unwrap();
/// assert_eq!(value, "Bearer anonymous");
/// ```
pub fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut missing: Option<String> = None;

    let expanded = env_var_regex().replace_all(input, |caps: &Captures| {
        let name = &caps[1];
        match (std::env::var(name), caps.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(ConfigError::validation(format!(
            "environment variable '{}' is not set and has no default",
            name
        ))),
        None => Ok(expanded.into_owned()),
    }
}
