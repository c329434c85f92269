// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

use super::*;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = GraphConfig::default();
    assert_eq!(config.controller_name, DEFAULT_CONTROLLER_NAME);
    assert_eq!(config.max_ancestors, 16);
    assert_eq!(config.protected_ports[&9113], "MetricsPort");
    assert_eq!(config.protected_ports[&8081], "HealthPort");
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_partial_keeps_defaults() {
    let file = write_config("maxAncestors: 4\n");
    let config = GraphConfig::from_file(file.path()).unwrap();

    assert_eq!(config.max_ancestors, 4);
    assert_eq!(config.controller_name, DEFAULT_CONTROLLER_NAME);
    assert_eq!(config.protected_ports.len(), 2);
}

#[test]
fn test_from_file_replaces_protected_ports() {
    let file = write_config(
        "controllerName: example.com/gateway\nprotectedPorts:\n  9000: Admin\n",
    );
    let config = GraphConfig::from_file(file.path()).unwrap();

    assert_eq!(config.controller_name, "example.com/gateway");
    assert_eq!(
        config.protected_ports,
        ProtectedPorts::from([(9000, "Admin".to_string())])
    );
}

#[test]
fn test_from_file_missing() {
    let err = GraphConfig::from_file(Path::new("/nonexistent/gateway-graph.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_from_file_malformed() {
    let file = write_config("maxAncestors: many\n");
    let err = GraphConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_from_file_rejects_zero_ancestors() {
    let file = write_config("maxAncestors: 0\n");
    let err = GraphConfig::from_file(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "invalid maxAncestors: must be at least 1");
}

#[test]
fn test_from_file_rejects_bad_protected_port() {
    let file = write_config("protectedPorts:\n  70000: Admin\n");
    let err = GraphConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "protectedPorts",
            ..
        }
    ));
}

#[test]
fn test_env_overrides() {
    let mut config = GraphConfig::default();
    config
        .apply_env_with(lookup(&[
            (ENV_CONTROLLER_NAME, "example.com/other"),
            (ENV_MAX_ANCESTORS, " 32 "),
        ]))
        .unwrap();

    assert_eq!(config.controller_name, "example.com/other");
    assert_eq!(config.max_ancestors, 32);
}

#[test]
fn test_env_unset_leaves_config() {
    let mut config = GraphConfig::default();
    config.apply_env_with(lookup(&[])).unwrap();
    assert_eq!(config, GraphConfig::default());
}

#[test]
fn test_env_invalid_max_ancestors() {
    let mut config = GraphConfig::default();
    let err = config
        .apply_env_with(lookup(&[(ENV_MAX_ANCESTORS, "lots")]))
        .unwrap_err();
    assert!(err.to_string().starts_with(
        "invalid value \"lots\" for GATEWAY_GRAPH_MAX_ANCESTORS:"
    ));

    let err = config
        .apply_env_with(lookup(&[(ENV_MAX_ANCESTORS, "0")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { .. }));
}

#[test]
fn test_env_empty_controller_name() {
    let mut config = GraphConfig::default();
    let err = config
        .apply_env_with(lookup(&[(ENV_CONTROLLER_NAME, "  ")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEnv {
            name: ENV_CONTROLLER_NAME,
            ..
        }
    ));
}
