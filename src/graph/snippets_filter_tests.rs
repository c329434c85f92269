// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `snippets_filter.rs`

use super::snippets_filter::*;
use crate::crd::{self, LocalObjectReference, NginxContext, Snippet, SnippetsFilterSpec};
use crate::field_errors::FieldErrorKind;
use crate::status_reasons::{CONDITION_STATUS_FALSE, CONDITION_TYPE_ACCEPTED, REASON_INVALID};
use crate::types::NamespacedName;
use std::collections::BTreeMap;

fn snippet(context: &str, value: &str) -> Snippet {
    Snippet {
        context: context.to_string(),
        value: value.to_string(),
    }
}

fn filter(snippets: Vec<Snippet>) -> crd::SnippetsFilter {
    let mut filter = crd::SnippetsFilter::new("filter", SnippetsFilterSpec { snippets });
    filter.metadata.namespace = Some("test".to_string());
    filter
}

fn all_contexts() -> Vec<Snippet> {
    vec![
        snippet("main", "worker_priority 0;"),
        snippet("http", "aio on;"),
        snippet("http.server", "auth_delay 10s;"),
        snippet("http.server.location", "keepalive_time 10s;"),
    ]
}

fn ext_ref(group: &str, kind: &str, name: &str) -> LocalObjectReference {
    LocalObjectReference {
        group: group.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_valid_filter() {
    assert!(validate_snippets_filter(&filter(all_contexts())).is_none());
}

#[test]
fn test_empty_filter() {
    let cond = validate_snippets_filter(&filter(Vec::new())).unwrap();

    assert_eq!(cond.r#type, CONDITION_TYPE_ACCEPTED);
    assert_eq!(cond.status, CONDITION_STATUS_FALSE);
    assert_eq!(cond.reason, REASON_INVALID);
    assert_eq!(
        cond.message,
        "spec.snippets: Required value: at least one snippet must be provided"
    );
}

#[test]
fn test_duplicate_context_cites_second_index() {
    let cond = validate_snippets_filter(&filter(vec![
        snippet("main", "worker_priority 0;"),
        snippet("main", "worker_rlimit_nofile 10;"),
    ]))
    .unwrap();

    assert_eq!(
        cond.message,
        "spec.snippets[1].context: Invalid value: \"main\": only one snippet is allowed per context"
    );
}

#[test]
fn test_errors_are_aggregated_in_order() {
    let f = filter(vec![
        snippet("http", "aio on;"),
        snippet("http", "gzip on;"),
        snippet("stream", "tcp_nodelay on;"),
    ]);

    let errs = snippets_filter_errors(&f);
    let kinds: Vec<_> = errs.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [FieldErrorKind::Invalid, FieldErrorKind::NotSupported]
    );

    let cond = validate_snippets_filter(&f).unwrap();
    assert_eq!(
        cond.message,
        "[spec.snippets[1].context: Invalid value: \"http\": only one snippet is allowed per context, \
         spec.snippets[2].context: Unsupported value: \"stream\": supported values: \
         \"main\", \"http\", \"http.server\", \"http.server.location\"]"
    );
}

#[test]
fn test_empty_values_are_all_reported() {
    let errs = snippets_filter_errors(&filter(vec![
        snippet("main", ""),
        snippet("http", ""),
    ]));

    let paths: Vec<_> = errs.iter().map(|e| e.path().as_str().to_string()).collect();
    assert_eq!(paths, ["spec.snippets[0].value", "spec.snippets[1].value"]);
    assert!(errs.iter().all(|e| e.kind() == FieldErrorKind::Required));
}

#[test]
fn test_repeated_unsupported_context() {
    let errs = snippets_filter_errors(&filter(vec![
        snippet("stream", "a;"),
        snippet("stream", "b;"),
    ]));
    let kinds: Vec<_> = errs.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [
            FieldErrorKind::NotSupported,
            FieldErrorKind::NotSupported,
            FieldErrorKind::Invalid
        ]
    );
}

#[test]
fn test_process_snippets_filters() {
    let filters = BTreeMap::from([
        (NamespacedName::new("test", "valid"), filter(all_contexts())),
        (NamespacedName::new("test", "invalid"), filter(Vec::new())),
    ]);

    let processed = process_snippets_filters(&filters);

    let valid = &processed[&NamespacedName::new("test", "valid")];
    assert!(valid.valid);
    assert!(!valid.referenced);
    assert!(valid.conditions.is_empty());
    assert_eq!(valid.snippets.len(), 4);
    assert_eq!(
        valid.snippets[&NginxContext::HttpServerLocation],
        "keepalive_time 10s;"
    );

    let invalid = &processed[&NamespacedName::new("test", "invalid")];
    assert!(!invalid.valid);
    assert!(invalid.snippets.is_empty());
    assert_eq!(invalid.conditions.len(), 1);
}

#[test]
fn test_resolve_extension_ref() {
    let mut processed = process_snippets_filters(&BTreeMap::from([(
        NamespacedName::new("test", "filter"),
        filter(all_contexts()),
    )]));

    let resolved = resolve_extension_ref(
        &mut processed,
        "test",
        &ext_ref("gateway.nginx.org", "SnippetsFilter", "filter"),
    )
    .unwrap();

    assert_eq!(
        resolved,
        ExtensionRefFilter {
            snippets_filter: NamespacedName::new("test", "filter"),
            valid: true,
        }
    );
    assert!(processed[&NamespacedName::new("test", "filter")].referenced);
}

#[test]
fn test_resolve_extension_ref_misses() {
    let mut processed = process_snippets_filters(&BTreeMap::from([(
        NamespacedName::new("test", "filter"),
        filter(all_contexts()),
    )]));

    let misses = [
        ("test", ext_ref("gateway.nginx.org", "SnippetsFilter", "missing")),
        ("other", ext_ref("gateway.nginx.org", "SnippetsFilter", "filter")),
        ("test", ext_ref("example.com", "SnippetsFilter", "filter")),
        ("test", ext_ref("gateway.nginx.org", "ClientSettingsPolicy", "filter")),
    ];
    for (namespace, reference) in &misses {
        assert!(resolve_extension_ref(&mut processed, namespace, reference).is_none());
    }
    assert!(!processed[&NamespacedName::new("test", "filter")].referenced);
}
