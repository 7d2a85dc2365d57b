//! Repository configuration
//!
//! Loaded from a JSON or YAML file, then overridden field by field from the
//! environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::rdf::DEFAULT_OVERRIDES;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax or schema error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or schema error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value is present but unusable
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Triple store connection and mapping settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SPARQL query endpoint
    pub endpoint: String,
    /// SPARQL update endpoint, `endpoint` when unset
    pub update_endpoint: Option<String>,
    /// Named graph holding every entity; also the prefix of generated ids
    pub graph: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Log every query text at info level
    pub log_queries: bool,
    /// Parse every generated query before sending it
    pub validate_queries: bool,
    /// Link followed by select-deep to merge inherited data
    pub overrides_predicate: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8890/sparql".to_string(),
            update_endpoint: None,
            graph: "http://iot.local/repository".to_string(),
            user: None,
            password: None,
            timeout_secs: 10,
            log_queries: false,
            validate_queries: false,
            overrides_predicate: DEFAULT_OVERRIDES.to_string(),
        }
    }
}

impl Config {
    /// Read a config file; `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if yaml {
            serde_yaml::from_str(&text)?
        } else {
            serde_json::from_str(&text)?
        };
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    ///
    /// Reads `SPARQL_ENDPOINT`, `SPARQL_UPDATE_ENDPOINT`, `RDF_GRAPH`,
    /// `RDF_USER`, `RDF_PW`, `SPARQL_TIMEOUT`, `SPARQL_LOG` and
    /// `SPARQL_VALIDATE`.
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(v) = var("SPARQL_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = var("SPARQL_UPDATE_ENDPOINT") {
            self.update_endpoint = Some(v);
        }
        if let Some(v) = var("RDF_GRAPH") {
            self.graph = v;
        }
        if let Some(v) = var("RDF_USER") {
            self.user = Some(v);
        }
        if let Some(v) = var("RDF_PW") {
            self.password = Some(v);
        }
        if let Some(v) = var("SPARQL_TIMEOUT") {
            self.timeout_secs = v.parse().map_err(|_| ConfigError::Invalid {
                field: "SPARQL_TIMEOUT",
                reason: format!("{v:?} is not a number of seconds"),
            })?;
        }
        if let Some(v) = var("SPARQL_LOG") {
            self.log_queries = parse_flag("SPARQL_LOG", &v)?;
        }
        if let Some(v) = var("SPARQL_VALIDATE") {
            self.validate_queries = parse_flag("SPARQL_VALIDATE", &v)?;
        }
        Ok(())
    }

    /// Check that endpoints and IRIs are absolute IRIs
    pub fn validate(&self) -> ConfigResult<()> {
        check_iri("endpoint", &self.endpoint)?;
        if let Some(update) = &self.update_endpoint {
            check_iri("update_endpoint", update)?;
        }
        check_iri("graph", &self.graph)?;
        check_iri("overrides_predicate", &self.overrides_predicate)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

fn check_iri(field: &'static str, value: &str) -> ConfigResult<()> {
    oxiri::Iri::parse(value).map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("{value:?}: {e}"),
    })?;
    Ok(())
}

fn parse_flag(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            field,
            reason: format!("{value:?} is not a boolean"),
        }),
    }
}
