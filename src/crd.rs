// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gateway API resource types consumed by the graph engine.
//!
//! This module declares the subset of the Gateway API model that the resolution and
//! validation engine reads: Gateways and their Listeners, `BackendTLSPolicy`
//! resources, and the NGINX `SnippetsFilter` extension. Types are declared with the
//! `kube` derive so they deserialize from the same manifests the API server serves and
//! so the `SnippetsFilter` CRD can be generated from Rust.
//!
//! Fields whose values are validated by the engine (protocols, TLS modes, snippet
//! contexts, reference kinds) are kept as plain strings: the engine must be able to
//! represent and report values it does not support.
//!
//! # Resource Types
//!
//! - [`Gateway`] - Listener bindings for a data plane
//! - [`BackendTLSPolicy`] - TLS settings for connections to a backend
//! - [`SnippetsFilter`] - Raw NGINX configuration snippets attached to routes
//!
//! # Example: Declaring a Gateway
//!
//! ```rust
//! use gateway_graph::crd::{Gateway, GatewayListener, GatewaySpec};
//!
//! let gateway = Gateway::new(
//!     "gateway",
//!     GatewaySpec {
//!         gateway_class_name: "nginx".to_string(),
//!         listeners: vec![GatewayListener {
//!             name: "http".to_string(),
//!             hostname: Some("cafe.example.com".to_string()),
//!             port: 80,
//!             protocol: "HTTP".to_string(),
//!             tls: None,
//!             allowed_routes: None,
//!         }],
//!     },
//! );
//! assert_eq!(gateway.spec.listeners.len(), 1);
//! ```

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Condition as written into resource status.
///
/// Conditions are used in status subresources to communicate the state of
/// a resource to users and controllers.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCondition {
    /// Type of condition: Accepted, Programmed, ResolvedRefs, Conflicted.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    pub reason: String,

    /// Human-readable message indicating details about the transition.
    pub message: String,

    /// Generation of the resource the condition was computed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

// ============================================================================
// Gateway
// ============================================================================

/// `Gateway` binds a set of listeners to a data plane.
///
/// # Example
///
/// ```yaml
/// apiVersion: gateway.networking.k8s.io/v1
/// kind: Gateway
/// metadata:
///   name: gateway
///   namespace: default
/// spec:
///   gatewayClassName: nginx
///   listeners:
///     - name: https
///       port: 443
///       protocol: HTTPS
///       hostname: "*.example.com"
///       tls:
///         mode: Terminate
///         certificateRefs:
///           - kind: Secret
///             name: cafe-secret
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1",
    kind = "Gateway",
    namespaced,
    doc = "Gateway represents an instance of a service-traffic handling infrastructure by binding Listeners to a set of IP addresses."
)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    /// Name of the `GatewayClass` this Gateway belongs to.
    pub gateway_class_name: String,

    /// Logical endpoints bound on this Gateway's addresses.
    #[serde(default)]
    pub listeners: Vec<GatewayListener>,
}

/// A named protocol + port + hostname binding on a Gateway.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayListener {
    /// Listener name, unique within the Gateway.
    pub name: String,

    /// Optional hostname; may be a single-label wildcard such as `*.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Network port. Kept signed so out-of-range values can be reported.
    pub port: i32,

    /// Protocol: `HTTP`, `HTTPS`, `TLS`, or a value the engine will reject.
    pub protocol: String,

    /// TLS configuration for `HTTPS` and `TLS` listeners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<GatewayTlsConfig>,

    /// Which routes may attach to this listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_routes: Option<AllowedRoutes>,
}

/// TLS block of a listener.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTlsConfig {
    /// `Terminate` (the default when unset) or `Passthrough`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Secrets holding the serving certificate.
    #[serde(default)]
    pub certificate_refs: Vec<SecretObjectReference>,

    /// Implementation-specific TLS options.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// Reference to a Secret, possibly in another namespace.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretObjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Route attachment restrictions of a listener.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllowedRoutes {
    /// Namespaces routes may attach from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<RouteNamespaces>,

    /// Route kinds allowed to attach. Absent means every kind the protocol supports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<RouteGroupKind>>,
}

/// Namespace restriction for attaching routes.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteNamespaces {
    /// `All`, `Same`, or `Selector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Required when `from` is `Selector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,
}

/// A route kind, optionally qualified by API group.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteGroupKind {
    /// API group; unset means the Gateway API group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    pub kind: String,
}

impl fmt::Display for RouteGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self
            .group
            .as_deref()
            .unwrap_or(crate::constants::GATEWAY_API_GROUP);
        write!(f, "{group}/{}", self.kind)
    }
}

// ============================================================================
// BackendTLSPolicy
// ============================================================================

/// `BackendTLSPolicy` configures how the data plane validates a backend's TLS certificate.
///
/// # Example
///
/// ```yaml
/// apiVersion: gateway.networking.k8s.io/v1alpha3
/// kind: BackendTLSPolicy
/// metadata:
///   name: backend-tls
///   namespace: default
/// spec:
///   targetRefs:
///     - group: ""
///       kind: Service
///       name: secure-app
///   validation:
///     hostname: secure-app.example.com
///     caCertificateRefs:
///       - group: ""
///         kind: ConfigMap
///         name: backend-cert
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1alpha3",
    kind = "BackendTLSPolicy",
    namespaced,
    doc = "BackendTLSPolicy provides a way to configure how a Gateway connects to a Backend via TLS."
)]
#[kube(status = "PolicyStatus")]
#[serde(rename_all = "camelCase")]
pub struct BackendTLSPolicySpec {
    /// Backends this policy applies to.
    #[serde(default)]
    pub target_refs: Vec<LocalPolicyTargetReference>,

    /// How the backend certificate is validated.
    pub validation: BackendTLSPolicyValidation,
}

/// Validation settings of a `BackendTLSPolicy`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendTLSPolicyValidation {
    /// ConfigMaps holding the CA bundle. Mutually exclusive with `well_known_ca_certificates`.
    #[serde(default)]
    pub ca_certificate_refs: Vec<LocalObjectReference>,

    /// Well-known trust store selector. Only `System` is supported.
    #[serde(
        default,
        rename = "wellKnownCACertificates",
        skip_serializing_if = "Option::is_none"
    )]
    pub well_known_ca_certificates: Option<String>,

    /// SNI and certificate hostname the backend must present.
    pub hostname: String,
}

/// Reference to an object in the same namespace.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    #[serde(default)]
    pub group: String,
    pub kind: String,
    pub name: String,
}

/// Target of a policy, in the policy's namespace.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalPolicyTargetReference {
    #[serde(default)]
    pub group: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

/// Status of a policy: one entry per ancestor (Gateway) per controller.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatus {
    #[serde(default)]
    pub ancestors: Vec<PolicyAncestorStatus>,
}

/// Status reported by one controller for one ancestor of a policy.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAncestorStatus {
    pub ancestor_ref: ParentReference,
    pub controller_name: String,
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
}

/// Reference to a parent (ancestor) object such as a Gateway.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

// ============================================================================
// SnippetsFilter
// ============================================================================

/// `SnippetsFilter` injects raw NGINX configuration into the generated config.
///
/// # Example
///
/// ```yaml
/// apiVersion: gateway.nginx.org/v1alpha1
/// kind: SnippetsFilter
/// metadata:
///   name: rate-limit
///   namespace: default
/// spec:
///   snippets:
///     - context: http
///       value: limit_req_zone $binary_remote_addr zone=one:10m rate=1r/s;
///     - context: http.server.location
///       value: limit_req zone=one burst=5;
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "gateway.nginx.org",
    version = "v1alpha1",
    kind = "SnippetsFilter",
    namespaced,
    shortname = "snippetsfilter",
    doc = "SnippetsFilter is a filter that allows inserting NGINX configuration into the generated NGINX config for HTTPRoute and GRPCRoute resources."
)]
#[kube(status = "SnippetsFilterStatus")]
#[serde(rename_all = "camelCase")]
pub struct SnippetsFilterSpec {
    /// Snippets to insert, at most one per context.
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

/// One NGINX configuration snippet.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// NGINX context: `main`, `http`, `http.server`, or `http.server.location`.
    pub context: String,

    /// Raw NGINX configuration.
    pub value: String,
}

/// Status of a `SnippetsFilter`, one entry per controller.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnippetsFilterStatus {
    #[serde(default)]
    pub controllers: Vec<ControllerStatus>,
}

/// Conditions reported by a single controller.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatus {
    pub controller_name: String,
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
}

/// NGINX configuration context a snippet is inserted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NginxContext {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "http.server")]
    HttpServer,
    #[serde(rename = "http.server.location")]
    HttpServerLocation,
}

impl NginxContext {
    /// Every supported context, in nesting order.
    pub const ALL: [NginxContext; 4] = [
        NginxContext::Main,
        NginxContext::Http,
        NginxContext::HttpServer,
        NginxContext::HttpServerLocation,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Http => "http",
            Self::HttpServer => "http.server",
            Self::HttpServerLocation => "http.server.location",
        }
    }

    /// Parse a context name; `None` for unsupported contexts.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ctx| ctx.as_str() == value)
    }
}

impl fmt::Display for NginxContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
