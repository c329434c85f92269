// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Serializable summary of a built graph.
//!
//! The report carries the status each resource would be given: conditions are
//! stamped with the resource generation and a transition time, and valid resources
//! get their positive conditions.

use crate::conditions::{
    backend_tls_policy_accepted, deduplicate_conditions, listener_default_conditions,
    snippets_filter_accepted, Condition,
};
use crate::crd::StatusCondition;
use crate::graph::backend_tls_policy::BackendTlsPolicy;
use crate::graph::listener::Listener;
use crate::graph::snippets_filter::SnippetsFilter;
use crate::graph::Graph;
use crate::resolver::Resolved;
use crate::types::NamespacedName;
use chrono::{DateTime, Utc};
use kube::Resource;
use serde::Serialize;
use std::collections::BTreeMap;

/// Status of every resource processed by one graph build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayReport>,
    pub backend_tls_policies: Vec<BackendTlsPolicyReport>,
    pub snippets_filters: Vec<SnippetsFilterReport>,
    pub referenced_secrets: Vec<ReferenceReport>,
    pub referenced_config_maps: Vec<ReferenceReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReport {
    pub name: String,
    pub listeners: Vec<ListenerReport>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerReport {
    pub name: String,
    pub valid: bool,
    pub attachable: bool,
    pub supported_kinds: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_secret: Option<String>,
    pub conditions: Vec<StatusCondition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendTlsPolicyReport {
    pub name: String,
    pub valid: bool,
    pub ignored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert_ref: Option<String>,
    pub conditions: Vec<StatusCondition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetsFilterReport {
    pub name: String,
    pub valid: bool,
    pub referenced: bool,
    pub contexts: Vec<String>,
    pub conditions: Vec<StatusCondition>,
}

/// A Secret or ConfigMap some resource referenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceReport {
    pub name: String,
    pub exists: bool,
    pub valid: bool,
}

impl GraphReport {
    /// Summarize a graph, stamping conditions with `now`.
    #[must_use]
    pub fn from_graph(graph: &Graph, now: DateTime<Utc>) -> Self {
        Self {
            gateway: graph.gateway.as_ref().map(|gw| {
                let generation = gw.source.meta().generation;
                GatewayReport {
                    name: gw.nsname().to_string(),
                    listeners: gw
                        .listeners
                        .iter()
                        .map(|l| listener_report(l, generation, now))
                        .collect(),
                }
            }),
            backend_tls_policies: graph
                .backend_tls_policies
                .iter()
                .map(|(nsname, policy)| policy_report(nsname, policy, now))
                .collect(),
            snippets_filters: graph
                .snippets_filters
                .iter()
                .map(|(nsname, filter)| filter_report(nsname, filter, now))
                .collect(),
            referenced_secrets: references(&graph.referenced_secrets),
            referenced_config_maps: references(&graph.referenced_ca_cert_config_maps),
        }
    }
}

fn stamp(conds: Vec<Condition>, generation: Option<i64>, now: DateTime<Utc>) -> Vec<StatusCondition> {
    deduplicate_conditions(conds)
        .iter()
        .map(|cond| cond.to_status(generation, now))
        .collect()
}

fn listener_report(listener: &Listener, generation: Option<i64>, now: DateTime<Utc>) -> ListenerReport {
    let mut conds = listener_default_conditions();
    conds.extend(listener.conditions.iter().cloned());

    ListenerReport {
        name: listener.name.clone(),
        valid: listener.valid,
        attachable: listener.attachable,
        supported_kinds: listener
            .supported_kinds
            .iter()
            .map(ToString::to_string)
            .collect(),
        resolved_secret: listener.resolved_secret.as_ref().map(ToString::to_string),
        conditions: stamp(conds, generation, now),
    }
}

fn policy_report(
    nsname: &NamespacedName,
    policy: &BackendTlsPolicy,
    now: DateTime<Utc>,
) -> BackendTlsPolicyReport {
    let conds = if policy.valid {
        vec![backend_tls_policy_accepted()]
    } else {
        policy.conditions.clone()
    };

    BackendTlsPolicyReport {
        name: nsname.to_string(),
        valid: policy.valid,
        ignored: policy.ignored,
        ca_cert_ref: policy.ca_cert_ref.as_ref().map(ToString::to_string),
        conditions: stamp(conds, policy.source.meta().generation, now),
    }
}

fn filter_report(
    nsname: &NamespacedName,
    filter: &SnippetsFilter,
    now: DateTime<Utc>,
) -> SnippetsFilterReport {
    let conds = if filter.valid {
        vec![snippets_filter_accepted()]
    } else {
        filter.conditions.clone()
    };

    SnippetsFilterReport {
        name: nsname.to_string(),
        valid: filter.valid,
        referenced: filter.referenced,
        contexts: filter.snippets.keys().map(ToString::to_string).collect(),
        conditions: stamp(conds, filter.source.meta().generation, now),
    }
}

fn references<O>(resolved: &BTreeMap<NamespacedName, Resolved<O>>) -> Vec<ReferenceReport> {
    resolved
        .iter()
        .map(|(nsname, r)| ReferenceReport {
            name: nsname.to_string(),
            exists: r.source.is_some(),
            valid: r.cert_bundle.is_some(),
        })
        .collect()
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
