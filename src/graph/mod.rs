// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Graph builder.
//!
//! Turns a snapshot of cluster resources into a validated [`Graph`]. Every build
//! owns a fresh Secret and ConfigMap resolver, so a referenced object is validated
//! once per build no matter how many resources point at it.
//!
//! # Build Steps
//!
//! 1. **Gateway** - select the Gateway and validate its listeners, resolving
//!    listener TLS Secrets
//! 2. **BackendTLSPolicies** - validate each policy against the Gateway, resolving
//!    CA ConfigMaps
//! 3. **SnippetsFilters** - validate each filter
//! 4. **References** - collect every Secret and ConfigMap the build resolved
//!
//! Building never fails: every problem ends up as a condition on the resource it
//! belongs to.
//!
//! # Example
//!
//! ```rust
//! use gateway_graph::config::GraphConfig;
//! use gateway_graph::graph::{build_graph, ClusterState};
//!
//! let graph = build_graph(&ClusterState::default(), &GraphConfig::default());
//! assert!(graph.gateway.is_none());
//! assert!(graph.backend_tls_policies.is_empty());
//! ```

pub mod backend_tls_policy;
pub mod gateway;
pub mod listener;
pub mod snippets_filter;

#[cfg(test)]
mod gateway_tests;
#[cfg(test)]
mod snippets_filter_tests;

use crate::config::GraphConfig;
use crate::constants::{KIND_BACKEND_TLS_POLICY, KIND_SNIPPETS_FILTER};
use crate::crd;
use crate::metrics::{
    record_graph_build, record_resource, OUTCOME_IGNORED, OUTCOME_INVALID, OUTCOME_VALID,
};
use crate::resolver::{ConfigMapResolver, ResolvedConfigMap, ResolvedSecret, SecretResolver};
use crate::types::NamespacedName;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use backend_tls_policy::{process_backend_tls_policies, BackendTlsPolicy};
use gateway::{build_gateway, select_gateway, Gateway};
use snippets_filter::{process_snippets_filters, SnippetsFilter};

/// Metric kind label for listeners.
const KIND_LISTENER: &str = "Listener";

/// Cluster resources a graph is built from, keyed by namespaced name.
#[derive(Clone, Debug, Default)]
pub struct ClusterState {
    pub gateways: BTreeMap<NamespacedName, crd::Gateway>,
    pub secrets: BTreeMap<NamespacedName, Secret>,
    pub config_maps: BTreeMap<NamespacedName, ConfigMap>,
    pub backend_tls_policies: BTreeMap<NamespacedName, crd::BackendTLSPolicy>,
    pub snippets_filters: BTreeMap<NamespacedName, crd::SnippetsFilter>,
}

/// The validated resources of one build.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// The processed Gateway, if the snapshot holds one
    pub gateway: Option<Gateway>,
    pub backend_tls_policies: BTreeMap<NamespacedName, BackendTlsPolicy>,
    pub snippets_filters: BTreeMap<NamespacedName, SnippetsFilter>,
    /// Every Secret resolved during the build, including missing and invalid ones
    pub referenced_secrets: BTreeMap<NamespacedName, ResolvedSecret>,
    /// Every CA ConfigMap resolved during the build, including missing and invalid ones
    pub referenced_ca_cert_config_maps: BTreeMap<NamespacedName, ResolvedConfigMap>,
}

/// Build the graph for a snapshot of cluster state.
#[must_use]
pub fn build_graph(state: &ClusterState, config: &GraphConfig) -> Graph {
    let start = Instant::now();

    let mut secret_resolver = SecretResolver::new(&state.secrets);
    let mut config_map_resolver = ConfigMapResolver::new(&state.config_maps);

    let gateway = select_gateway(&state.gateways).map(|(_, gw)| {
        build_gateway(gw, &mut secret_resolver, &config.protected_ports)
    });
    let gateway_nsname = gateway.as_ref().map(Gateway::nsname);

    let backend_tls_policies = process_backend_tls_policies(
        &state.backend_tls_policies,
        &mut config_map_resolver,
        &config.controller_name,
        gateway_nsname.as_ref(),
        config.max_ancestors,
    );

    let snippets_filters = process_snippets_filters(&state.snippets_filters);

    let graph = Graph {
        gateway,
        backend_tls_policies,
        snippets_filters,
        referenced_secrets: secret_resolver.resolved(),
        referenced_ca_cert_config_maps: config_map_resolver.resolved(),
    };

    record_outcomes(&graph);
    record_graph_build(start.elapsed());

    info!(
        "Built graph: gateway={} listeners={} backendTLSPolicies={} snippetsFilters={} secrets={} configMaps={}",
        gateway_nsname.map_or_else(|| "none".to_string(), |nsname| nsname.to_string()),
        graph.gateway.as_ref().map_or(0, |gw| gw.listeners.len()),
        graph.backend_tls_policies.len(),
        graph.snippets_filters.len(),
        graph.referenced_secrets.len(),
        graph.referenced_ca_cert_config_maps.len()
    );

    graph
}

fn outcome(valid: bool) -> &'static str {
    if valid {
        OUTCOME_VALID
    } else {
        OUTCOME_INVALID
    }
}

fn record_outcomes(graph: &Graph) {
    if let Some(gateway) = &graph.gateway {
        for listener in &gateway.listeners {
            record_resource(KIND_LISTENER, outcome(listener.valid));
        }
    }
    for policy in graph.backend_tls_policies.values() {
        let label = if policy.ignored {
            OUTCOME_IGNORED
        } else {
            outcome(policy.valid)
        };
        record_resource(KIND_BACKEND_TLS_POLICY, label);
    }
    for filter in graph.snippets_filters.values() {
        record_resource(KIND_SNIPPETS_FILTER, outcome(filter.valid));
    }
}
