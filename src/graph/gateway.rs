// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The Gateway processed by the graph.

use crate::crd;
use crate::graph::listener::{build_listeners, Listener, ProtectedPorts};
use crate::resolver::SecretResolver;
use crate::types::NamespacedName;
use serde::Serialize;
use std::collections::BTreeMap;

/// A Gateway with its validated listeners.
#[derive(Clone, Debug, Serialize)]
pub struct Gateway {
    pub source: crd::Gateway,
    /// Listeners in declaration order
    pub listeners: Vec<Listener>,
}

impl Gateway {
    #[must_use]
    pub fn nsname(&self) -> NamespacedName {
        NamespacedName::of(&self.source)
    }
}

/// Pick the Gateway to process: the first one by namespaced name.
#[must_use]
pub fn select_gateway(
    gateways: &BTreeMap<NamespacedName, crd::Gateway>,
) -> Option<(&NamespacedName, &crd::Gateway)> {
    gateways.iter().next()
}

/// Validate the listeners of a Gateway, resolving their TLS Secrets.
pub fn build_gateway(
    gateway: &crd::Gateway,
    secret_resolver: &mut SecretResolver<'_>,
    protected_ports: &ProtectedPorts,
) -> Gateway {
    Gateway {
        source: gateway.clone(),
        listeners: build_listeners(gateway, secret_resolver, protected_ports),
    }
}
