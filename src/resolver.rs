// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Memoizing reference resolvers for Secrets and ConfigMaps.
//!
//! A [`Resolver`] is built once per graph build over a fixed snapshot of cluster
//! objects of one kind. The first [`Resolver::resolve`] call for an identity validates
//! the object and caches the outcome; later calls return the cached outcome without
//! validating again. [`Resolver::resolved`] returns an owned copy of everything
//! resolved so far, which the graph exposes as the set of referenced objects.
//!
//! The per-kind validation lives behind the [`ResolvableKind`] trait:
//!
//! - [`SecretKind`] requires a `kubernetes.io/tls` Secret with a valid key pair and,
//!   when present, a valid `ca.crt`
//! - [`ConfigMapKind`] requires a `ca.crt` entry in `binaryData` or `data` holding a
//!   valid CA certificate
//!
//! # Example
//!
//! ```rust
//! use gateway_graph::resolver::ConfigMapResolver;
//! use gateway_graph::types::NamespacedName;
//! use std::collections::BTreeMap;
//!
//! let config_maps = BTreeMap::new();
//! let mut resolver = ConfigMapResolver::new(&config_maps);
//!
//! let err = resolver.resolve(&NamespacedName::new("default", "missing")).unwrap_err();
//! assert_eq!(err.to_string(), "ConfigMap does not exist");
//! assert_eq!(resolver.resolved().len(), 1);
//! ```

use crate::certificates::{validate_ca, validate_certificate_bundle, Certificate, CertificateBundle};
use crate::constants::{
    CA_CERT_KEY, KIND_CONFIG_MAP, KIND_SECRET, SECRET_TYPE_TLS, TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY,
};
use crate::graph_errors::ResolveError;
use crate::types::NamespacedName;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Per-kind validation performed on the first resolution of an identity.
pub trait ResolvableKind {
    /// Kind name used in error messages (`Secret`, `ConfigMap`)
    const KIND: &'static str;

    /// Cluster object type held by the snapshot
    type Object: Clone + fmt::Debug;

    /// Validate an object and extract its certificate material.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Malformed`] for objects of the wrong shape and
    /// [`ResolveError::Certificate`] for invalid certificate data.
    fn certificate_bundle(
        &self,
        nsname: &NamespacedName,
        obj: &Self::Object,
    ) -> Result<CertificateBundle, ResolveError>;
}

/// A referenced object together with its validated certificate material.
///
/// `source` is `None` when the object does not exist. `cert_bundle` is only set
/// when validation succeeded.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<O> {
    pub source: Option<O>,
    pub cert_bundle: Option<CertificateBundle>,
}

#[derive(Clone, Debug)]
struct Entry<O> {
    resolved: Resolved<O>,
    error: Option<ResolveError>,
}

impl<O> Entry<O> {
    fn outcome(&self) -> Result<(), ResolveError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Memoizing resolver over one kind of cluster object.
pub struct Resolver<'a, K: ResolvableKind> {
    kind: K,
    cluster_objects: &'a BTreeMap<NamespacedName, K::Object>,
    entries: BTreeMap<NamespacedName, Entry<K::Object>>,
}

impl<'a, K: ResolvableKind + Default> Resolver<'a, K> {
    #[must_use]
    pub fn new(cluster_objects: &'a BTreeMap<NamespacedName, K::Object>) -> Self {
        Self::with_kind(K::default(), cluster_objects)
    }
}

impl<'a, K: ResolvableKind> Resolver<'a, K> {
    #[must_use]
    pub fn with_kind(kind: K, cluster_objects: &'a BTreeMap<NamespacedName, K::Object>) -> Self {
        Self {
            kind,
            cluster_objects,
            entries: BTreeMap::new(),
        }
    }

    /// Resolve a reference, validating the object on first use.
    ///
    /// # Errors
    ///
    /// Returns the cached [`ResolveError`] for the identity: `NotFound` when the
    /// object is absent, otherwise the validation error of the kind.
    pub fn resolve(&mut self, nsname: &NamespacedName) -> Result<(), ResolveError> {
        if let Some(entry) = self.entries.get(nsname) {
            return entry.outcome();
        }

        let entry = match self.cluster_objects.get(nsname) {
            None => Entry {
                resolved: Resolved {
                    source: None,
                    cert_bundle: None,
                },
                error: Some(ResolveError::NotFound { kind: K::KIND }),
            },
            Some(obj) => match self.kind.certificate_bundle(nsname, obj) {
                Ok(bundle) => Entry {
                    resolved: Resolved {
                        source: Some(obj.clone()),
                        cert_bundle: Some(bundle),
                    },
                    error: None,
                },
                Err(err) => Entry {
                    resolved: Resolved {
                        source: Some(obj.clone()),
                        cert_bundle: None,
                    },
                    error: Some(err),
                },
            },
        };

        if let Some(err) = &entry.error {
            debug!("{} {} failed to resolve: {}", K::KIND, nsname, err);
        } else {
            debug!("{} {} resolved", K::KIND, nsname);
        }

        let outcome = entry.outcome();
        self.entries.insert(nsname.clone(), entry);
        outcome
    }

    /// Owned snapshot of every identity resolved so far.
    #[must_use]
    pub fn resolved(&self) -> BTreeMap<NamespacedName, Resolved<K::Object>> {
        self.entries
            .iter()
            .map(|(nsname, entry)| (nsname.clone(), entry.resolved.clone()))
            .collect()
    }

    #[must_use]
    pub fn get(&self, nsname: &NamespacedName) -> Option<&Resolved<K::Object>> {
        self.entries.get(nsname).map(|entry| &entry.resolved)
    }
}

// ============================================================================
// Secret
// ============================================================================

/// Validation of `kubernetes.io/tls` Secrets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecretKind;

impl ResolvableKind for SecretKind {
    const KIND: &'static str = KIND_SECRET;
    type Object = Secret;

    fn certificate_bundle(
        &self,
        nsname: &NamespacedName,
        secret: &Secret,
    ) -> Result<CertificateBundle, ResolveError> {
        let secret_type = secret.type_.as_deref().unwrap_or_default();
        if secret_type != SECRET_TYPE_TLS {
            return Err(ResolveError::Malformed {
                reason: format!("secret type must be \"{SECRET_TYPE_TLS}\" not \"{secret_type}\""),
            });
        }

        let data_value = |key: &str| -> Vec<u8> {
            secret
                .data
                .as_ref()
                .and_then(|data| data.get(key))
                .map(|value| value.0.clone())
                .unwrap_or_default()
        };

        let cert = Certificate {
            tls_cert: data_value(TLS_CERT_KEY),
            tls_private_key: data_value(TLS_PRIVATE_KEY_KEY),
            ca_cert: data_value(CA_CERT_KEY),
        };

        validate_certificate_bundle(&cert)?;

        Ok(CertificateBundle::new(nsname.clone(), KIND_SECRET, cert))
    }
}

// ============================================================================
// ConfigMap
// ============================================================================

/// Validation of CA certificate ConfigMaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigMapKind;

impl ResolvableKind for ConfigMapKind {
    const KIND: &'static str = KIND_CONFIG_MAP;
    type Object = ConfigMap;

    fn certificate_bundle(
        &self,
        nsname: &NamespacedName,
        config_map: &ConfigMap,
    ) -> Result<CertificateBundle, ResolveError> {
        let binary = config_map
            .binary_data
            .as_ref()
            .and_then(|data| data.get(CA_CERT_KEY))
            .map(|value| value.0.clone())
            .filter(|value| !value.is_empty());
        let text = config_map
            .data
            .as_ref()
            .and_then(|data| data.get(CA_CERT_KEY))
            .map(|value| value.as_bytes().to_vec())
            .filter(|value| !value.is_empty());

        let Some(ca_cert) = binary.or(text) else {
            return Err(ResolveError::Malformed {
                reason: format!(
                    "ConfigMap does not have the data or binaryData field {CA_CERT_KEY}"
                ),
            });
        };

        validate_ca(&ca_cert)?;

        Ok(CertificateBundle::new(
            nsname.clone(),
            KIND_CONFIG_MAP,
            Certificate {
                ca_cert,
                ..Default::default()
            },
        ))
    }
}

/// Resolver over TLS Secrets.
pub type SecretResolver<'a> = Resolver<'a, SecretKind>;

/// Resolver over CA certificate ConfigMaps.
pub type ConfigMapResolver<'a> = Resolver<'a, ConfigMapKind>;

/// A resolved Secret.
pub type ResolvedSecret = Resolved<Secret>;

/// A resolved CA certificate ConfigMap.
pub type ResolvedConfigMap = Resolved<ConfigMap>;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
