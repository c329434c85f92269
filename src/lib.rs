// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # gateway-graph - Gateway API resource resolution and validation
//!
//! gateway-graph turns a snapshot of Gateway API resources into a validated graph:
//! every Gateway listener, `BackendTLSPolicy` and `SnippetsFilter` comes out with a
//! validity flag and the status conditions that explain it.
//!
//! ## Overview
//!
//! - Certificate bundle validation for TLS Secrets and CA ConfigMaps
//! - Memoizing Secret and ConfigMap reference resolution
//! - Per-protocol listener validation with port and hostname conflict detection
//! - `BackendTLSPolicy` validation, including ancestor status capacity
//! - `SnippetsFilter` validation
//!
//! ## Modules
//!
//! - [`crd`] - Gateway API resource types
//! - [`certificates`] - Certificate and CA validation
//! - [`resolver`] - Secret and ConfigMap resolvers
//! - [`graph`] - Graph builder and per-resource validators
//! - [`conditions`] - Status conditions produced by the validators
//! - [`config`] - Build configuration
//! - [`snapshot`] - Loading cluster state from YAML manifests
//! - [`report`] - Serializable graph summary
//!
//! ## Example
//!
//! ```rust
//! use gateway_graph::config::GraphConfig;
//! use gateway_graph::graph::build_graph;
//! use gateway_graph::snapshot::load_snapshot_str;
//!
//! let state = load_snapshot_str(
//!     r#"
//! apiVersion: gateway.networking.k8s.io/v1
//! kind: Gateway
//! metadata:
//!   name: gateway
//!   namespace: default
//! spec:
//!   gatewayClassName: nginx
//!   listeners:
//!     - name: http
//!       port: 80
//!       protocol: HTTP
//! "#,
//! )
//! .unwrap();
//!
//! let graph = build_graph(&state, &GraphConfig::default());
//! assert!(graph.gateway.unwrap().listeners[0].valid);
//! ```

pub mod certificates;
pub mod conditions;
pub mod config;
pub mod constants;
pub mod crd;
pub mod field_errors;
pub mod graph;
pub mod graph_errors;
pub mod hostname;
pub mod metrics;
pub mod report;
pub mod resolver;
pub mod snapshot;
pub mod status_reasons;
pub mod types;

#[cfg(test)]
mod status_reasons_tests;
