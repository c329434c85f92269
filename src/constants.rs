// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Gateway API graph engine.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group of the upstream Gateway API resources
pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// API group of the NGINX extension resources (`SnippetsFilter`)
pub const NGINX_GATEWAY_API_GROUP: &str = "gateway.nginx.org";

/// Core API group alias accepted on CA certificate references
pub const CORE_API_GROUP: &str = "core";

/// Kind name for `Gateway` resource
pub const KIND_GATEWAY: &str = "Gateway";

/// Kind name for `HTTPRoute` resource
pub const KIND_HTTP_ROUTE: &str = "HTTPRoute";

/// Kind name for `GRPCRoute` resource
pub const KIND_GRPC_ROUTE: &str = "GRPCRoute";

/// Kind name for `TLSRoute` resource
pub const KIND_TLS_ROUTE: &str = "TLSRoute";

/// Kind name for `BackendTLSPolicy` resource
pub const KIND_BACKEND_TLS_POLICY: &str = "BackendTLSPolicy";

/// Kind name for `SnippetsFilter` resource
pub const KIND_SNIPPETS_FILTER: &str = "SnippetsFilter";

/// Kind name for core `Secret` resource
pub const KIND_SECRET: &str = "Secret";

/// Kind name for core `ConfigMap` resource
pub const KIND_CONFIG_MAP: &str = "ConfigMap";

// ============================================================================
// Certificate Data Keys
// ============================================================================

/// Secret type required for TLS certificate Secrets
pub const SECRET_TYPE_TLS: &str = "kubernetes.io/tls";

/// Data key of the TLS certificate in a TLS Secret
pub const TLS_CERT_KEY: &str = "tls.crt";

/// Data key of the TLS private key in a TLS Secret
pub const TLS_PRIVATE_KEY_KEY: &str = "tls.key";

/// Data key holding CA certificate material in Secrets and ConfigMaps
pub const CA_CERT_KEY: &str = "ca.crt";

/// PEM block type accepted for CA certificates
pub const PEM_TYPE_CERTIFICATE: &str = "CERTIFICATE";

// ============================================================================
// Listener Protocol Constants
// ============================================================================

/// Listener protocol for plain HTTP
pub const PROTOCOL_HTTP: &str = "HTTP";

/// Listener protocol for TLS-terminated HTTP
pub const PROTOCOL_HTTPS: &str = "HTTPS";

/// Listener protocol for TLS passthrough
pub const PROTOCOL_TLS: &str = "TLS";

/// TLS mode that terminates TLS at the gateway
pub const TLS_MODE_TERMINATE: &str = "Terminate";

/// TLS mode that passes the TLS stream through to the backend
pub const TLS_MODE_PASSTHROUGH: &str = "Passthrough";

/// `allowedRoutes.namespaces.from` value that requires a label selector
pub const NAMESPACES_FROM_SELECTOR: &str = "Selector";

/// Lowest valid listener port
pub const MIN_PORT: i32 = 1;

/// Highest valid listener port
pub const MAX_PORT: i32 = 65535;

// ============================================================================
// BackendTLSPolicy Constants
// ============================================================================

/// The only supported `wellKnownCACertificates` value
pub const WELL_KNOWN_CA_CERTIFICATES_SYSTEM: &str = "System";

/// Default number of ancestor status entries a policy may carry
pub const DEFAULT_MAX_ANCESTORS: usize = 16;

// ============================================================================
// Controller Defaults
// ============================================================================

/// Default controller name used for ancestor ownership comparisons
pub const DEFAULT_CONTROLLER_NAME: &str = "gateway.nginx.org/nginx-gateway-controller";

/// Default metrics port reserved by the data plane
pub const DEFAULT_METRICS_PORT: i32 = 9113;

/// Default health probe port reserved by the data plane
pub const DEFAULT_HEALTH_PORT: i32 = 8081;

/// Environment variable overriding the controller name
pub const ENV_CONTROLLER_NAME: &str = "GATEWAY_GRAPH_CONTROLLER_NAME";

/// Environment variable overriding the ancestor capacity
pub const ENV_MAX_ANCESTORS: &str = "GATEWAY_GRAPH_MAX_ANCESTORS";
