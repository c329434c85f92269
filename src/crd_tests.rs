// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

use super::*;
use kube::CustomResourceExt;

#[test]
fn test_gateway_deserializes_from_manifest() {
    let yaml = r#"
apiVersion: gateway.networking.k8s.io/v1
kind: Gateway
metadata:
  name: gateway
  namespace: default
spec:
  gatewayClassName: nginx
  listeners:
    - name: https
      port: 443
      protocol: HTTPS
      hostname: "*.example.com"
      tls:
        mode: Terminate
        certificateRefs:
          - kind: Secret
            name: cafe-secret
      allowedRoutes:
        namespaces:
          from: Selector
          selector:
            matchLabels:
              team: cafe
        kinds:
          - kind: HTTPRoute
"#;
    let gateway: Gateway = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(gateway.spec.gateway_class_name, "nginx");

    let listener = &gateway.spec.listeners[0];
    assert_eq!(listener.port, 443);
    assert_eq!(listener.hostname.as_deref(), Some("*.example.com"));

    let tls = listener.tls.as_ref().unwrap();
    assert_eq!(tls.mode.as_deref(), Some("Terminate"));
    assert_eq!(tls.certificate_refs[0].name, "cafe-secret");
    assert!(tls.options.is_empty());

    let allowed = listener.allowed_routes.as_ref().unwrap();
    let namespaces = allowed.namespaces.as_ref().unwrap();
    assert_eq!(namespaces.from.as_deref(), Some("Selector"));
    assert!(namespaces.selector.is_some());
    assert_eq!(allowed.kinds.as_ref().unwrap()[0].kind, "HTTPRoute");
}

#[test]
fn test_backend_tls_policy_well_known_field_name() {
    let yaml = r#"
apiVersion: gateway.networking.k8s.io/v1alpha3
kind: BackendTLSPolicy
metadata:
  name: policy
  namespace: default
spec:
  targetRefs:
    - group: ""
      kind: Service
      name: backend
  validation:
    hostname: backend.example.com
    wellKnownCACertificates: System
"#;
    let policy: BackendTLSPolicy = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        policy.spec.validation.well_known_ca_certificates.as_deref(),
        Some("System")
    );
    assert!(policy.spec.validation.ca_certificate_refs.is_empty());
    assert!(policy.status.is_none());
}

#[test]
fn test_policy_status_round_trips_ancestors() {
    let status = PolicyStatus {
        ancestors: vec![PolicyAncestorStatus {
            ancestor_ref: ParentReference {
                namespace: Some("default".to_string()),
                name: "gateway".to_string(),
                ..Default::default()
            },
            controller_name: "example.com/controller".to_string(),
            conditions: vec![],
        }],
    };
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["ancestors"][0]["ancestorRef"]["name"], "gateway");
    assert_eq!(json["ancestors"][0]["controllerName"], "example.com/controller");
}

#[test]
fn test_nginx_context_parse() {
    assert_eq!(NginxContext::parse("main"), Some(NginxContext::Main));
    assert_eq!(
        NginxContext::parse("http.server.location"),
        Some(NginxContext::HttpServerLocation)
    );
    assert_eq!(NginxContext::parse("stream"), None);
    assert_eq!(NginxContext::parse(""), None);
}

#[test]
fn test_nginx_context_display_matches_wire_name() {
    for ctx in NginxContext::ALL {
        let wire = serde_json::to_value(ctx).unwrap();
        assert_eq!(wire, ctx.to_string());
    }
}

#[test]
fn test_route_group_kind_display_defaults_group() {
    let kind = RouteGroupKind {
        group: None,
        kind: "HTTPRoute".to_string(),
    };
    assert_eq!(kind.to_string(), "gateway.networking.k8s.io/HTTPRoute");
}

#[test]
fn test_snippets_filter_crd_metadata() {
    let crd = SnippetsFilter::crd();
    assert_eq!(crd.spec.group, "gateway.nginx.org");
    assert_eq!(crd.spec.names.kind, "SnippetsFilter");
    assert_eq!(crd.spec.scope, "Namespaced");
    assert_eq!(crd.spec.versions[0].name, "v1alpha1");
}

#[test]
fn test_status_condition_skips_empty_optionals() {
    let cond = StatusCondition {
        r#type: "Accepted".to_string(),
        status: "True".to_string(),
        reason: "Accepted".to_string(),
        message: String::new(),
        observed_generation: None,
        last_transition_time: None,
    };
    let json = serde_json::to_value(&cond).unwrap();
    assert!(json.get("observedGeneration").is_none());
    assert!(json.get("lastTransitionTime").is_none());
    assert_eq!(json["type"], "Accepted");
}
