// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `gateway.rs`

use super::gateway::*;
use super::listener::ProtectedPorts;
use crate::crd::{self, GatewayListener, GatewaySpec};
use crate::resolver::SecretResolver;
use crate::types::NamespacedName;
use std::collections::BTreeMap;

fn gateway(namespace: &str, name: &str, listeners: Vec<GatewayListener>) -> crd::Gateway {
    let mut gw = crd::Gateway::new(
        name,
        GatewaySpec {
            gateway_class_name: "nginx".to_string(),
            listeners,
        },
    );
    gw.metadata.namespace = Some(namespace.to_string());
    gw
}

fn http(name: &str, port: i32) -> GatewayListener {
    GatewayListener {
        name: name.to_string(),
        port,
        protocol: "HTTP".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_select_gateway_first_by_name() {
    let gateways = BTreeMap::from([
        (
            NamespacedName::new("b", "gateway"),
            gateway("b", "gateway", Vec::new()),
        ),
        (
            NamespacedName::new("a", "second"),
            gateway("a", "second", Vec::new()),
        ),
        (
            NamespacedName::new("a", "first"),
            gateway("a", "first", Vec::new()),
        ),
    ]);

    let (nsname, _) = select_gateway(&gateways).unwrap();
    assert_eq!(*nsname, NamespacedName::new("a", "first"));
    assert!(select_gateway(&BTreeMap::new()).is_none());
}

#[test]
fn test_build_gateway() {
    let secrets = BTreeMap::new();
    let mut resolver = SecretResolver::new(&secrets);
    let source = gateway("test", "gateway", vec![http("http", 80), http("bad", 0)]);

    let gw = build_gateway(&source, &mut resolver, &ProtectedPorts::new());

    assert_eq!(gw.nsname(), NamespacedName::new("test", "gateway"));
    assert_eq!(gw.listeners.len(), 2);
    assert_eq!(gw.listeners[0].name, "http");
    assert!(gw.listeners[0].valid);
    assert!(!gw.listeners[1].valid);
}
