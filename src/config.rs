// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Graph build configuration.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults ([`GraphConfig::default`])
//! 2. An optional YAML file ([`GraphConfig::from_file`])
//! 3. Environment variables ([`GraphConfig::apply_env`])
//!
//! # Example
//!
//! ```yaml
//! controllerName: gateway.nginx.org/nginx-gateway-controller
//! maxAncestors: 16
//! protectedPorts:
//!   9113: MetricsPort
//!   8081: HealthPort
//! ```

use crate::constants::{
    DEFAULT_CONTROLLER_NAME, DEFAULT_HEALTH_PORT, DEFAULT_MAX_ANCESTORS, DEFAULT_METRICS_PORT,
    ENV_CONTROLLER_NAME, ENV_MAX_ANCESTORS, MAX_PORT, MIN_PORT,
};
use crate::graph::listener::ProtectedPorts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`GraphConfig`]
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment variable holds an unusable value
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A setting is out of range
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Settings for one graph build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    /// Name this controller writes into policy ancestor status
    pub controller_name: String,

    /// Ports listeners may not use, mapped to their purpose
    pub protected_ports: ProtectedPorts,

    /// Ancestor status entries a policy may hold
    pub max_ancestors: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            controller_name: DEFAULT_CONTROLLER_NAME.to_string(),
            protected_ports: ProtectedPorts::from([
                (DEFAULT_METRICS_PORT, "MetricsPort".to_string()),
                (DEFAULT_HEALTH_PORT, "HealthPort".to_string()),
            ]),
            max_ancestors: DEFAULT_MAX_ANCESTORS,
        }
    }
}

impl GraphConfig {
    /// Load a YAML config file; fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or holds
    /// out-of-range values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for unusable values.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for unusable values.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ENV_CONTROLLER_NAME) {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidEnv {
                    name: ENV_CONTROLLER_NAME,
                    value: name,
                    reason: "must not be empty".to_string(),
                });
            }
            self.controller_name = name;
        }

        if let Some(value) = lookup(ENV_MAX_ANCESTORS) {
            let max = value
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidEnv {
                    name: ENV_MAX_ANCESTORS,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            if max == 0 {
                return Err(ConfigError::InvalidEnv {
                    name: ENV_MAX_ANCESTORS,
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            self.max_ancestors = max;
        }

        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first out-of-range setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "controllerName",
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_ancestors == 0 {
            return Err(ConfigError::Invalid {
                field: "maxAncestors",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(port) = self
            .protected_ports
            .keys()
            .find(|port| !(MIN_PORT..=MAX_PORT).contains(*port))
        {
            return Err(ConfigError::Invalid {
                field: "protectedPorts",
                reason: format!("port {port} is not between {MIN_PORT}-{MAX_PORT}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
