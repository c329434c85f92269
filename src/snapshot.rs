// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Loading cluster snapshots from YAML manifests.
//!
//! A snapshot is one or more multi-document YAML streams, such as the output of
//! `kubectl get -o yaml` or a directory of manifests concatenated together. Each
//! document is dispatched on `kind`; `List` documents are unpacked, and kinds the
//! graph does not read are skipped. Objects without a namespace land in `default`.
//!
//! # Example
//!
//! ```rust
//! use gateway_graph::snapshot::load_snapshot_str;
//!
//! let state = load_snapshot_str(
//!     r#"
//! apiVersion: v1
//! kind: ConfigMap
//! metadata:
//!   name: ca
//! data:
//!   ca.crt: invalid
//! "#,
//! )
//! .unwrap();
//! assert_eq!(state.config_maps.len(), 1);
//! ```

use crate::constants::{
    KIND_BACKEND_TLS_POLICY, KIND_CONFIG_MAP, KIND_GATEWAY, KIND_SECRET, KIND_SNIPPETS_FILTER,
};
use crate::graph::ClusterState;
use crate::types::NamespacedName;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Namespace assigned to objects that do not declare one.
const DEFAULT_NAMESPACE: &str = "default";

/// Kind of the list wrapper produced by `kubectl get`.
const KIND_LIST: &str = "List";

/// Errors raised while loading a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// A snapshot file could not be read
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid YAML
    #[error("failed to parse YAML document {index}: {source}")]
    Yaml {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document does not match the schema of its kind
    #[error("invalid {kind} in document {index}: {source}")]
    Invalid {
        kind: String,
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document of a known kind has no `metadata.name`
    #[error("{kind} in document {index} has no metadata.name")]
    MissingName { kind: String, index: usize },
}

/// Load and merge snapshot files, later files overriding earlier ones.
///
/// # Errors
///
/// Returns [`SnapshotError`] for unreadable files and malformed documents.
pub fn load_snapshot_files<P: AsRef<Path>>(paths: &[P]) -> Result<ClusterState, SnapshotError> {
    let mut state = ClusterState::default();
    for path in paths {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        add_documents(&mut state, &contents)?;
        debug!("Loaded snapshot {}", path.display());
    }
    Ok(state)
}

/// Load a snapshot from a multi-document YAML string.
///
/// # Errors
///
/// Returns [`SnapshotError`] for malformed documents.
pub fn load_snapshot_str(contents: &str) -> Result<ClusterState, SnapshotError> {
    let mut state = ClusterState::default();
    add_documents(&mut state, contents)?;
    Ok(state)
}

fn add_documents(state: &mut ClusterState, contents: &str) -> Result<(), SnapshotError> {
    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = Value::deserialize(document)
            .map_err(|source| SnapshotError::Yaml { index, source })?;
        add_value(state, value, index)?;
    }
    Ok(())
}

fn add_value(state: &mut ClusterState, value: Value, index: usize) -> Result<(), SnapshotError> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        KIND_LIST => {
            if let Some(Value::Sequence(items)) = value.get("items") {
                for item in items {
                    add_value(state, item.clone(), index)?;
                }
            }
        }
        KIND_GATEWAY => insert(&mut state.gateways, value, &kind, index)?,
        KIND_SECRET => insert(&mut state.secrets, value, &kind, index)?,
        KIND_CONFIG_MAP => insert(&mut state.config_maps, value, &kind, index)?,
        KIND_BACKEND_TLS_POLICY => insert(&mut state.backend_tls_policies, value, &kind, index)?,
        KIND_SNIPPETS_FILTER => insert(&mut state.snippets_filters, value, &kind, index)?,
        other => debug!("Skipping document {} of kind {:?}", index, other),
    }
    Ok(())
}

fn insert<K>(
    objects: &mut BTreeMap<NamespacedName, K>,
    value: Value,
    kind: &str,
    index: usize,
) -> Result<(), SnapshotError>
where
    K: Resource + DeserializeOwned,
{
    let mut obj: K = serde_yaml::from_value(value).map_err(|source| SnapshotError::Invalid {
        kind: kind.to_string(),
        index,
        source,
    })?;

    if obj.meta().name.as_deref().is_none_or(str::is_empty) {
        return Err(SnapshotError::MissingName {
            kind: kind.to_string(),
            index,
        });
    }
    if obj.namespace().is_none() {
        obj.meta_mut().namespace = Some(DEFAULT_NAMESPACE.to_string());
    }

    objects.insert(NamespacedName::of(&obj), obj);
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
