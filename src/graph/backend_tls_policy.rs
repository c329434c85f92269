// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `BackendTLSPolicy` validation.
//!
//! A policy is validated against one Gateway. The checks run in order and each
//! failing check contributes its own `Accepted=False` condition:
//!
//! 1. **Ancestor capacity** - a policy whose ancestor status list is full, and which
//!    has no entry for this controller and Gateway, is ignored. Ignored policies are
//!    invalid and carry no conditions.
//! 2. **Hostname** - must be a DNS-1123 subdomain or a wildcard subdomain.
//! 3. **CA source** - exactly one of `caCertificateRefs` and
//!    `wellKnownCACertificates` must be set. A CA reference must name a single
//!    ConfigMap in the core group that resolves to a valid CA certificate.

use crate::conditions::{backend_tls_policy_invalid, Condition};
use crate::constants::{CORE_API_GROUP, KIND_CONFIG_MAP, WELL_KNOWN_CA_CERTIFICATES_SYSTEM};
use crate::crd::{BackendTLSPolicy, LocalObjectReference};
use crate::field_errors::{FieldError, FieldPath};
use crate::graph_errors::CapacityError;
use crate::hostname::validate_hostname;
use crate::resolver::ConfigMapResolver;
use crate::types::NamespacedName;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A `BackendTLSPolicy` after validation against one Gateway.
#[derive(Clone, Debug, Serialize)]
pub struct BackendTlsPolicy {
    /// Policy as read from the cluster
    pub source: BackendTLSPolicy,
    /// CA certificate ConfigMap, set only for a valid policy using `caCertificateRefs`
    pub ca_cert_ref: Option<NamespacedName>,
    /// Gateway the policy was validated against
    pub gateway: NamespacedName,
    pub conditions: Vec<Condition>,
    pub valid: bool,
    /// Another controller owns the policy's status
    pub ignored: bool,
}

/// Outcome of [`validate_backend_tls_policy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendTlsPolicyValidation {
    pub valid: bool,
    pub ignored: bool,
    pub ca_cert_ref: Option<NamespacedName>,
    pub conditions: Vec<Condition>,
}

/// Validate every policy against the Gateway.
///
/// Returns an empty map when there is no Gateway.
pub fn process_backend_tls_policies(
    policies: &BTreeMap<NamespacedName, BackendTLSPolicy>,
    config_map_resolver: &mut ConfigMapResolver<'_>,
    controller_name: &str,
    gateway: Option<&NamespacedName>,
    max_ancestors: usize,
) -> BTreeMap<NamespacedName, BackendTlsPolicy> {
    let Some(gateway) = gateway else {
        return BTreeMap::new();
    };

    policies
        .iter()
        .map(|(nsname, policy)| {
            let validation = validate_backend_tls_policy(
                policy,
                config_map_resolver,
                controller_name,
                gateway,
                max_ancestors,
            );
            if !validation.valid && !validation.ignored {
                debug!("BackendTLSPolicy {} is invalid", nsname);
            }
            let processed = BackendTlsPolicy {
                source: policy.clone(),
                ca_cert_ref: validation.ca_cert_ref,
                gateway: gateway.clone(),
                conditions: validation.conditions,
                valid: validation.valid,
                ignored: validation.ignored,
            };
            (nsname.clone(), processed)
        })
        .collect()
}

/// Validate one policy against a Gateway.
///
/// The CA ConfigMap is resolved through `config_map_resolver`, so it is recorded as
/// referenced even when the policy turns out to be ignored.
pub fn validate_backend_tls_policy(
    policy: &BackendTLSPolicy,
    config_map_resolver: &mut ConfigMapResolver<'_>,
    controller_name: &str,
    gateway: &NamespacedName,
    max_ancestors: usize,
) -> BackendTlsPolicyValidation {
    let policy_nsname = NamespacedName::of(policy);
    let mut valid = true;
    let mut ignored = false;
    let mut conditions = Vec::new();

    if let Err(err) = validate_ancestor_capacity(policy, controller_name, gateway, max_ancestors) {
        warn!("Ignoring BackendTLSPolicy {}: {}", policy_nsname, err);
        valid = false;
        ignored = true;
    }

    if let Err(err) = validate_policy_hostname(policy) {
        valid = false;
        conditions.push(backend_tls_policy_invalid(&format!("invalid hostname: {err}")));
    }

    let validation = &policy.spec.validation;
    let has_ca_refs = !validation.ca_certificate_refs.is_empty();
    let mut ca_cert_ref = None;

    match (has_ca_refs, validation.well_known_ca_certificates.as_deref()) {
        (true, Some(_)) => {
            valid = false;
            conditions.push(backend_tls_policy_invalid(
                "CACertificateRefs and WellKnownCACertificates are mutually exclusive",
            ));
        }
        (true, None) => {
            match validate_ca_cert_ref(
                &policy_nsname.namespace,
                &validation.ca_certificate_refs,
                config_map_resolver,
            ) {
                Ok(nsname) => ca_cert_ref = Some(nsname),
                Err(err) => {
                    valid = false;
                    conditions.push(backend_tls_policy_invalid(&format!(
                        "invalid CACertificateRef: {err}"
                    )));
                }
            }
        }
        (false, Some(well_known)) => {
            if let Err(err) = validate_well_known_ca_certificates(well_known) {
                valid = false;
                conditions.push(backend_tls_policy_invalid(&format!(
                    "invalid WellKnownCACertificates: {err}"
                )));
            }
        }
        (false, None) => {
            valid = false;
            conditions.push(backend_tls_policy_invalid(
                "CACertRefs and WellKnownCACerts are both nil",
            ));
        }
    }

    if ignored {
        conditions.clear();
    }
    if !valid {
        ca_cert_ref = None;
    }

    BackendTlsPolicyValidation {
        valid,
        ignored,
        ca_cert_ref,
        conditions,
    }
}

/// Check whether this controller may add or keep an ancestor entry for the Gateway.
///
/// # Errors
///
/// Returns [`CapacityError`] when the ancestor list is full and none of its entries
/// belongs to this controller and Gateway.
pub fn validate_ancestor_capacity(
    policy: &BackendTLSPolicy,
    controller_name: &str,
    gateway: &NamespacedName,
    max_ancestors: usize,
) -> Result<(), CapacityError> {
    let ancestors = policy
        .status
        .as_ref()
        .map(|status| status.ancestors.as_slice())
        .unwrap_or_default();

    if ancestors.len() < max_ancestors {
        return Ok(());
    }

    let already_ancestor = ancestors.iter().any(|ancestor| {
        ancestor.controller_name == controller_name
            && ancestor.ancestor_ref.name == gateway.name
            && ancestor.ancestor_ref.namespace.as_deref() == Some(gateway.namespace.as_str())
    });

    if already_ancestor {
        Ok(())
    } else {
        Err(CapacityError {
            count: ancestors.len(),
            max: max_ancestors,
        })
    }
}

fn validate_policy_hostname(policy: &BackendTLSPolicy) -> Result<(), FieldError> {
    let hostname = &policy.spec.validation.hostname;
    validate_hostname(hostname)
        .map_err(|detail| FieldError::invalid(FieldPath::new("tls").child("hostname"), hostname, detail))
}

fn validate_ca_cert_ref(
    namespace: &str,
    refs: &[LocalObjectReference],
    config_map_resolver: &mut ConfigMapResolver<'_>,
) -> Result<NamespacedName, FieldError> {
    let refs_path = FieldPath::new("tls").child("cacertrefs");

    let [ca_ref] = refs else {
        return Err(FieldError::too_many(refs_path, refs.len(), 1));
    };
    let ref_path = refs_path.index(0);

    if ca_ref.kind != KIND_CONFIG_MAP {
        return Err(FieldError::not_supported(
            ref_path.child("kind"),
            &ca_ref.kind,
            &[KIND_CONFIG_MAP],
        ));
    }

    if !ca_ref.group.is_empty() && ca_ref.group != CORE_API_GROUP {
        return Err(FieldError::not_supported(
            ref_path.child("group"),
            &ca_ref.group,
            &["", CORE_API_GROUP],
        ));
    }

    let nsname = NamespacedName::new(namespace, ca_ref.name.as_str());
    config_map_resolver
        .resolve(&nsname)
        .map_err(|err| FieldError::invalid(ref_path, &ca_ref.name, err.to_string()))?;

    Ok(nsname)
}

fn validate_well_known_ca_certificates(value: &str) -> Result<(), FieldError> {
    if value == WELL_KNOWN_CA_CERTIFICATES_SYSTEM {
        Ok(())
    } else {
        Err(FieldError::not_supported(
            FieldPath::new("tls").child("wellknowncacertificates"),
            value,
            &[WELL_KNOWN_CA_CERTIFICATES_SYSTEM],
        ))
    }
}
