// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gateway listener validation.
//!
//! Every listener is handled by a [`ListenerConfigurator`] chosen by its protocol.
//! A configurator runs its validators, each returning conditions and whether routes
//! may still attach. Listeners that pass every validator then go through:
//!
//! - the [`PortConflictResolver`] shared by all listeners of the Gateway, which
//!   rejects listeners whose protocols or hostnames clash on the same port
//! - TLS Secret resolution for `HTTPS` listeners
//!
//! Condition messages carry paths relative to the listener (`hostname`,
//! `tls.certificateRefs[0].kind`), since Gateway status reports conditions per listener.

use crate::conditions::{
    listener_hostname_conflict, listener_invalid_certificate_ref, listener_invalid_route_kinds,
    listener_protocol_conflict, listener_ref_not_permitted, listener_unsupported_protocol,
    listener_unsupported_value, Condition,
};
use crate::constants::{
    GATEWAY_API_GROUP, KIND_GRPC_ROUTE, KIND_HTTP_ROUTE, KIND_SECRET, KIND_TLS_ROUTE, MAX_PORT,
    MIN_PORT, NAMESPACES_FROM_SELECTOR, PROTOCOL_HTTP, PROTOCOL_HTTPS, PROTOCOL_TLS,
    TLS_MODE_PASSTHROUGH, TLS_MODE_TERMINATE,
};
use crate::crd::{Gateway, GatewayListener, RouteGroupKind};
use crate::field_errors::{FieldError, FieldPath};
use crate::hostname::validate_hostname;
use crate::resolver::SecretResolver;
use crate::types::NamespacedName;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Ports reserved by the data plane, mapped to what they are used for.
pub type ProtectedPorts = BTreeMap<i32, String>;

/// A Gateway listener after validation.
#[derive(Clone, Debug, Serialize)]
pub struct Listener {
    pub name: String,
    /// Listener as declared on the Gateway
    pub source: GatewayListener,
    /// Namespace selector for attaching routes, when `from` is `Selector`
    pub allowed_route_label_selector: Option<LabelSelector>,
    /// TLS Secret serving this listener (`HTTPS` only)
    pub resolved_secret: Option<NamespacedName>,
    pub conditions: Vec<Condition>,
    /// Route kinds that may attach
    pub supported_kinds: Vec<RouteGroupKind>,
    /// Configuration can be generated for the listener
    pub valid: bool,
    /// Routes may attach, even when the listener is invalid
    pub attachable: bool,
}

impl Listener {
    fn invalidate(&mut self, conds: Vec<Condition>) {
        self.valid = false;
        self.conditions.extend(conds);
    }
}

/// A single listener check.
///
/// Returns the conditions for every problem found and whether routes may still
/// attach to the listener.
pub trait ListenerValidator {
    fn validate(&self, listener: &GatewayListener) -> (Vec<Condition>, bool);
}

impl<F> ListenerValidator for F
where
    F: Fn(&GatewayListener) -> (Vec<Condition>, bool),
{
    fn validate(&self, listener: &GatewayListener) -> (Vec<Condition>, bool) {
        self(listener)
    }
}

/// Validators and resolvers applied to listeners of one protocol.
pub struct ListenerConfigurator<'a> {
    validators: Vec<Box<dyn ListenerValidator + 'a>>,
    resolve_port_conflicts: bool,
    resolve_tls_secrets: bool,
}

impl ListenerConfigurator<'_> {
    /// Run every validator; the listener is attachable only if all validators agree.
    #[must_use]
    pub fn validate(&self, listener: &GatewayListener) -> (Vec<Condition>, bool) {
        let mut conds = Vec::new();
        let mut attachable = true;
        for validator in &self.validators {
            let (curr_conds, curr_attachable) = validator.validate(listener);
            conds.extend(curr_conds);
            attachable = attachable && curr_attachable;
        }
        (conds, attachable)
    }

    /// Build the validated listener, before conflict and reference resolution.
    #[must_use]
    pub fn configure(&self, listener: &GatewayListener) -> Listener {
        let (mut conds, attachable) = self.validate(listener);
        let mut valid = conds.is_empty();

        let selector = allowed_route_label_selector(listener);
        if let Some(selector) = selector {
            if let Err(err) = validate_label_selector(selector) {
                conds.extend(listener_unsupported_value(&format!(
                    "invalid label selector: {err}"
                )));
                valid = false;
            }
        }

        Listener {
            name: listener.name.clone(),
            source: listener.clone(),
            allowed_route_label_selector: selector.cloned(),
            resolved_secret: None,
            conditions: conds,
            supported_kinds: listener_route_kinds(listener).1,
            valid,
            attachable,
        }
    }
}

/// Picks the [`ListenerConfigurator`] for a listener's protocol.
pub struct ListenerConfiguratorFactory<'a> {
    http: ListenerConfigurator<'a>,
    https: ListenerConfigurator<'a>,
    tls: ListenerConfigurator<'a>,
    unsupported_protocol: ListenerConfigurator<'a>,
}

impl<'a> ListenerConfiguratorFactory<'a> {
    #[must_use]
    pub fn new(protected_ports: &'a ProtectedPorts) -> Self {
        let shared = || {
            let mut validators: Vec<Box<dyn ListenerValidator + 'a>> = Vec::new();
            validators.push(Box::new(validate_listener_allowed_route_kinds));
            validators.push(Box::new(validate_listener_label_selector));
            validators.push(Box::new(validate_listener_hostname));
            validators
        };

        let mut http = shared();
        http.push(Box::new(move |l: &GatewayListener| {
            validate_http_listener(l, protected_ports)
        }));

        let mut https = shared();
        https.push(Box::new(move |l: &GatewayListener| {
            validate_https_listener(l, protected_ports)
        }));

        let mut tls = shared();
        tls.push(Box::new(move |l: &GatewayListener| {
            validate_tls_listener(l, protected_ports)
        }));

        Self {
            http: ListenerConfigurator {
                validators: http,
                resolve_port_conflicts: true,
                resolve_tls_secrets: false,
            },
            https: ListenerConfigurator {
                validators: https,
                resolve_port_conflicts: true,
                resolve_tls_secrets: true,
            },
            tls: ListenerConfigurator {
                validators: tls,
                resolve_port_conflicts: true,
                resolve_tls_secrets: false,
            },
            unsupported_protocol: ListenerConfigurator {
                validators: vec![Box::new(validate_unsupported_protocol) as Box<dyn ListenerValidator + 'a>],
                resolve_port_conflicts: false,
                resolve_tls_secrets: false,
            },
        }
    }

    #[must_use]
    pub fn for_listener(&self, listener: &GatewayListener) -> &ListenerConfigurator<'a> {
        match listener.protocol.as_str() {
            PROTOCOL_HTTP => &self.http,
            PROTOCOL_HTTPS => &self.https,
            PROTOCOL_TLS => &self.tls,
            _ => &self.unsupported_protocol,
        }
    }
}

/// Validate every listener of a Gateway, in declaration order.
pub fn build_listeners(
    gateway: &Gateway,
    secret_resolver: &mut SecretResolver<'_>,
    protected_ports: &ProtectedPorts,
) -> Vec<Listener> {
    let gateway_namespace = gateway.namespace().unwrap_or_default();
    let factory = ListenerConfiguratorFactory::new(protected_ports);
    let mut conflict_resolver = PortConflictResolver::default();
    let mut listeners: Vec<Listener> = Vec::with_capacity(gateway.spec.listeners.len());

    for source in &gateway.spec.listeners {
        let configurator = factory.for_listener(source);
        let idx = listeners.len();
        listeners.push(configurator.configure(source));

        if !listeners[idx].valid {
            debug!(
                "Listener {} of Gateway {}/{} is invalid",
                source.name,
                gateway_namespace,
                gateway.name_any()
            );
            continue;
        }

        if configurator.resolve_port_conflicts {
            conflict_resolver.resolve(&mut listeners, idx);
        }
        if configurator.resolve_tls_secrets {
            resolve_tls_secret(&mut listeners[idx], &gateway_namespace, secret_resolver);
        }
    }

    listeners
}

// ============================================================================
// Shared Validators
// ============================================================================

fn validate_listener_hostname(listener: &GatewayListener) -> (Vec<Condition>, bool) {
    let Some(hostname) = listener.hostname.as_deref() else {
        return (Vec::new(), true);
    };
    if hostname.is_empty() {
        return (Vec::new(), true);
    }

    match validate_hostname(hostname) {
        Ok(()) => (Vec::new(), true),
        Err(detail) => {
            let err = FieldError::invalid(FieldPath::new("hostname"), hostname, detail);
            (listener_unsupported_value(&err.to_string()), false)
        }
    }
}

fn validate_listener_allowed_route_kinds(listener: &GatewayListener) -> (Vec<Condition>, bool) {
    let (conds, _) = listener_route_kinds(listener);
    let attachable = conds.is_empty();
    (conds, attachable)
}

fn validate_listener_label_selector(listener: &GatewayListener) -> (Vec<Condition>, bool) {
    let missing_selector = listener
        .allowed_routes
        .as_ref()
        .and_then(|routes| routes.namespaces.as_ref())
        .is_some_and(|ns| {
            ns.from.as_deref() == Some(NAMESPACES_FROM_SELECTOR) && ns.selector.is_none()
        });

    if missing_selector {
        let msg = "Listener's AllowedRoutes Selector must be set when From is set to type Selector";
        return (listener_unsupported_value(msg), false);
    }
    (Vec::new(), true)
}

fn validate_unsupported_protocol(listener: &GatewayListener) -> (Vec<Condition>, bool) {
    let err = FieldError::not_supported(
        FieldPath::new("protocol"),
        &listener.protocol,
        &[PROTOCOL_HTTP, PROTOCOL_HTTPS, PROTOCOL_TLS],
    );
    (listener_unsupported_protocol(&err.to_string()), false)
}

/// Route kinds legal for a protocol.
#[must_use]
pub fn protocol_route_kinds(protocol: &str) -> Vec<RouteGroupKind> {
    let kinds: &[&str] = match protocol {
        PROTOCOL_HTTP | PROTOCOL_HTTPS => &[KIND_HTTP_ROUTE, KIND_GRPC_ROUTE],
        PROTOCOL_TLS => &[KIND_TLS_ROUTE],
        _ => &[],
    };
    kinds
        .iter()
        .map(|kind| RouteGroupKind {
            group: Some(GATEWAY_API_GROUP.to_string()),
            kind: (*kind).to_string(),
        })
        .collect()
}

/// Conditions for unsupported entries of `allowedRoutes.kinds`, and the supported kinds.
///
/// Without an explicit list the listener supports every kind legal for its protocol.
fn listener_route_kinds(listener: &GatewayListener) -> (Vec<Condition>, Vec<RouteGroupKind>) {
    let valid_kinds = protocol_route_kinds(&listener.protocol);

    let Some(kinds) = listener
        .allowed_routes
        .as_ref()
        .and_then(|routes| routes.kinds.as_ref())
    else {
        return (Vec::new(), valid_kinds);
    };

    let mut conds = Vec::new();
    let mut supported = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let group_ok = kind
            .group
            .as_deref()
            .is_none_or(|group| group == GATEWAY_API_GROUP);
        let kind_ok = valid_kinds.iter().any(|valid| valid.kind == kind.kind);

        if group_ok && kind_ok {
            supported.push(kind.clone());
        } else {
            let msg = format!(
                "Unsupported route kind for protocol {} \"{}\"",
                listener.protocol, kind
            );
            conds.extend(listener_invalid_route_kinds(&msg));
        }
    }
    (conds, supported)
}

fn allowed_route_label_selector(listener: &GatewayListener) -> Option<&LabelSelector> {
    let namespaces = listener.allowed_routes.as_ref()?.namespaces.as_ref()?;
    if namespaces.from.as_deref() == Some(NAMESPACES_FROM_SELECTOR) {
        namespaces.selector.as_ref()
    } else {
        None
    }
}

/// Check that a label selector can be turned into a matcher.
fn validate_label_selector(selector: &LabelSelector) -> Result<(), String> {
    for requirement in selector.match_expressions.iter().flatten() {
        let values = requirement.values.as_deref().unwrap_or_default();
        match requirement.operator.as_str() {
            "In" | "NotIn" => {
                if values.is_empty() {
                    return Err(format!(
                        "key {}: for 'in', 'notin' operators, values set can't be empty",
                        requirement.key
                    ));
                }
            }
            "Exists" | "DoesNotExist" => {
                if !values.is_empty() {
                    return Err(format!(
                        "key {}: values set must be empty for exists and does not exist",
                        requirement.key
                    ));
                }
            }
            op => return Err(format!("{op:?} is not a valid label selector operator")),
        }
    }
    Ok(())
}

/// Check a listener port against the valid range and the protected ports.
///
/// # Errors
///
/// Returns the failure detail for an out-of-range or protected port.
pub fn validate_listener_port(port: i32, protected_ports: &ProtectedPorts) -> Result<(), String> {
    if !(MIN_PORT..=MAX_PORT).contains(&port) {
        return Err(format!("port must be between {MIN_PORT}-{MAX_PORT}"));
    }
    if let Some(purpose) = protected_ports.get(&port) {
        return Err(format!("port is already in use as {purpose}"));
    }
    Ok(())
}

fn port_conditions(port: i32, protected_ports: &ProtectedPorts) -> Vec<Condition> {
    match validate_listener_port(port, protected_ports) {
        Ok(()) => Vec::new(),
        Err(detail) => {
            let err = FieldError::invalid_raw(FieldPath::new("port"), port, detail);
            listener_unsupported_value(&err.to_string())
        }
    }
}

// ============================================================================
// Protocol Validators
// ============================================================================

fn validate_http_listener(
    listener: &GatewayListener,
    protected_ports: &ProtectedPorts,
) -> (Vec<Condition>, bool) {
    let mut conds = port_conditions(listener.port, protected_ports);

    if listener.tls.is_some() {
        let err = FieldError::forbidden(FieldPath::new("tls"), "tls is not supported for HTTP listener");
        conds.extend(listener_unsupported_value(&err.to_string()));
    }

    (conds, true)
}

fn validate_https_listener(
    listener: &GatewayListener,
    protected_ports: &ProtectedPorts,
) -> (Vec<Condition>, bool) {
    let mut conds = port_conditions(listener.port, protected_ports);
    let tls_path = FieldPath::new("tls");

    let Some(tls) = &listener.tls else {
        let err = FieldError::required(tls_path, "tls must be defined for HTTPS listener");
        conds.extend(listener_unsupported_value(&err.to_string()));
        return (conds, true);
    };

    let mode = tls.mode.as_deref().unwrap_or(TLS_MODE_TERMINATE);
    if mode != TLS_MODE_TERMINATE {
        let err = FieldError::not_supported(tls_path.child("mode"), mode, &[TLS_MODE_TERMINATE]);
        conds.extend(listener_unsupported_value(&err.to_string()));
    }

    if !tls.options.is_empty() {
        let err = FieldError::forbidden(tls_path.child("options"), "options are not supported");
        conds.extend(listener_unsupported_value(&err.to_string()));
    }

    let refs_path = tls_path.child("certificateRefs");
    let Some(cert_ref) = tls.certificate_refs.first() else {
        let err = FieldError::required(
            refs_path,
            "certificateRefs must be defined for TLS mode terminate",
        );
        conds.extend(listener_invalid_certificate_ref(&err.to_string()));
        return (conds, true);
    };

    let ref_path = refs_path.index(0);

    if let Some(kind) = cert_ref.kind.as_deref() {
        if kind != KIND_SECRET {
            let err = FieldError::not_supported(ref_path.child("kind"), kind, &[KIND_SECRET]);
            conds.extend(listener_invalid_certificate_ref(&err.to_string()));
        }
    }

    if let Some(group) = cert_ref.group.as_deref() {
        if !group.is_empty() {
            let err = FieldError::not_supported(ref_path.child("group"), group, &[""]);
            conds.extend(listener_invalid_certificate_ref(&err.to_string()));
        }
    }

    let count = tls.certificate_refs.len();
    if count > 1 {
        let err = FieldError::too_many(refs_path, count, 1);
        conds.extend(listener_unsupported_value(&err.to_string()));
    }

    (conds, true)
}

fn validate_tls_listener(
    listener: &GatewayListener,
    protected_ports: &ProtectedPorts,
) -> (Vec<Condition>, bool) {
    let mut conds = port_conditions(listener.port, protected_ports);
    let tls_path = FieldPath::new("tls");

    let Some(tls) = &listener.tls else {
        let err = FieldError::required(tls_path, "tls must be defined for TLS listener");
        conds.extend(listener_unsupported_value(&err.to_string()));
        return (conds, false);
    };

    if tls.mode.as_deref() != Some(TLS_MODE_PASSTHROUGH) {
        let err = FieldError::required(
            tls_path.child("mode"),
            "Mode must be passthrough for TLS listener",
        );
        conds.extend(listener_unsupported_value(&err.to_string()));
        return (conds, false);
    }

    (conds, true)
}

// ============================================================================
// Hostname Overlap
// ============================================================================

/// Whether `pattern` is a wildcard covering `hostname`.
fn wildcard_matches(pattern: &str, hostname: &str) -> bool {
    let Some(domain) = pattern.strip_prefix("*.") else {
        return false;
    };
    if hostname.starts_with("*.") {
        return false;
    }
    hostname == domain
        || hostname
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1)
}

/// Whether two listener hostnames can match the same request.
///
/// A missing hostname matches everything. Distinct wildcards never overlap, and a
/// wildcard covers its own domain and any hostname ending in `.domain`.
#[must_use]
pub fn hostnames_overlap(first: Option<&str>, second: Option<&str>) -> bool {
    let (Some(first), Some(second)) = (first, second) else {
        return true;
    };
    first == second || wildcard_matches(first, second) || wildcard_matches(second, first)
}

// ============================================================================
// Conflict Resolution
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProtocolGroup {
    Secure,
    Insecure,
}

impl ProtocolGroup {
    fn of(protocol: &str) -> Self {
        if protocol == PROTOCOL_HTTP {
            Self::Insecure
        } else {
            Self::Secure
        }
    }
}

/// Tracks listeners by port across one Gateway to reject clashing listeners.
///
/// A port is owned by the protocol group (`HTTP` or `HTTPS`/`TLS`) of its first
/// listener. A listener of the other group marks the port as conflicted, which
/// invalidates every listener on it. Within the secure group, `HTTPS` and `TLS`
/// listeners on the same port must not have overlapping hostnames.
#[derive(Debug, Default)]
pub struct PortConflictResolver {
    conflicted_ports: BTreeSet<i32>,
    port_protocol_owner: BTreeMap<i32, ProtocolGroup>,
    listeners_by_port: BTreeMap<i32, Vec<usize>>,
}

impl PortConflictResolver {
    /// Resolve conflicts for `listeners[idx]` against the listeners seen before it.
    ///
    /// Earlier conflicting listeners are invalidated as well.
    pub fn resolve(&mut self, listeners: &mut [Listener], idx: usize) {
        let port = listeners[idx].source.port;
        let protocol = listeners[idx].source.protocol.clone();

        let protocol_msg = format!(
            "Multiple listeners for the same port {port} specify incompatible protocols; \
             ensure only one protocol per port"
        );

        if self.conflicted_ports.contains(&port) {
            listeners[idx].invalidate(listener_protocol_conflict(&protocol_msg));
            return;
        }

        let group = ProtocolGroup::of(&protocol);
        match self.port_protocol_owner.get(&port).copied() {
            None => {
                self.port_protocol_owner.insert(port, group);
            }
            Some(owner) if owner != group => {
                self.conflicted_ports.insert(port);
                for &other in self.listeners_by_port.get(&port).into_iter().flatten() {
                    listeners[other].invalidate(listener_protocol_conflict(&protocol_msg));
                }
                listeners[idx].invalidate(listener_protocol_conflict(&protocol_msg));
            }
            Some(_) => {
                let hostname_msg = format!(
                    "HTTPS and TLS listeners for the same port {port} specify overlapping hostnames; \
                     ensure no overlapping hostnames for HTTPS and TLS listeners for the same port"
                );
                let hostname = listeners[idx].source.hostname.clone();
                let mut found_conflict = false;

                for &other in self.listeners_by_port.get(&port).into_iter().flatten() {
                    let other = &mut listeners[other];
                    if other.source.protocol != protocol
                        && hostnames_overlap(hostname.as_deref(), other.source.hostname.as_deref())
                    {
                        other.invalidate(listener_hostname_conflict(&hostname_msg));
                        found_conflict = true;
                    }
                }

                if found_conflict {
                    listeners[idx].invalidate(listener_hostname_conflict(&hostname_msg));
                }
            }
        }

        self.listeners_by_port.entry(port).or_default().push(idx);
    }
}

// ============================================================================
// TLS Secret Resolution
// ============================================================================

/// Resolve the certificate Secret of an `HTTPS` listener.
///
/// References into another namespace are rejected.
fn resolve_tls_secret(
    listener: &mut Listener,
    gateway_namespace: &str,
    secret_resolver: &mut SecretResolver<'_>,
) {
    let Some(cert_ref) = listener
        .source
        .tls
        .as_ref()
        .and_then(|tls| tls.certificate_refs.first())
    else {
        return;
    };

    let namespace = cert_ref
        .namespace
        .clone()
        .unwrap_or_else(|| gateway_namespace.to_string());
    let nsname = NamespacedName::new(namespace, cert_ref.name.as_str());

    if nsname.namespace != gateway_namespace {
        let msg = format!("Certificate ref to secret {nsname} not permitted by any ReferenceGrant");
        listener.invalidate(listener_ref_not_permitted(&msg));
        return;
    }

    match secret_resolver.resolve(&nsname) {
        Ok(()) => listener.resolved_secret = Some(nsname),
        Err(err) => {
            let path = FieldPath::new("tls").child("certificateRefs").index(0);
            let err = FieldError::invalid(path, &nsname.to_string(), err.to_string());
            listener.invalidate(listener_invalid_certificate_ref(&err.to_string()));
        }
    }
}
