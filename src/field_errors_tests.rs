// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `field_errors.rs`

use super::*;

#[test]
fn test_field_path_child_and_index() {
    let path = FieldPath::new("tls").child("certificateRefs").index(0).child("kind");
    assert_eq!(path.as_str(), "tls.certificateRefs[0].kind");
}

#[test]
fn test_invalid_quotes_string_values() {
    let err = FieldError::invalid(FieldPath::new("hostname"), "bad_host", "not a hostname");
    assert_eq!(err.to_string(), r#"hostname: Invalid value: "bad_host": not a hostname"#);
    assert_eq!(err.kind(), FieldErrorKind::Invalid);
}

#[test]
fn test_invalid_raw_keeps_numbers_unquoted() {
    let err = FieldError::invalid_raw(FieldPath::new("port"), 0, "port must be between 1-65535");
    assert_eq!(err.to_string(), "port: Invalid value: 0: port must be between 1-65535");
}

#[test]
fn test_required_message() {
    let err = FieldError::required(FieldPath::new("spec.snippets"), "at least one snippet must be provided");
    assert_eq!(
        err.to_string(),
        "spec.snippets: Required value: at least one snippet must be provided"
    );
}

#[test]
fn test_not_supported_lists_all_values() {
    let err = FieldError::not_supported(
        FieldPath::new("protocol"),
        "UDP",
        &["HTTP", "HTTPS", "TLS"],
    );
    assert_eq!(
        err.to_string(),
        r#"protocol: Unsupported value: "UDP": supported values: "HTTP", "HTTPS", "TLS""#
    );
    assert_eq!(err.kind(), FieldErrorKind::NotSupported);
}

#[test]
fn test_forbidden_and_too_many() {
    let forbidden = FieldError::forbidden(FieldPath::new("tls"), "tls is not supported for HTTP listener");
    assert_eq!(
        forbidden.to_string(),
        "tls: Forbidden: tls is not supported for HTTP listener"
    );

    let too_many = FieldError::too_many(FieldPath::new("tls.cacertrefs"), 2, 1);
    assert_eq!(
        too_many.to_string(),
        "tls.cacertrefs: Too many: 2: must have at most 1 items"
    );
    assert_eq!(too_many.path().as_str(), "tls.cacertrefs");
}

#[test]
fn test_aggregate_empty_is_none() {
    assert_eq!(FieldErrorList::new().to_aggregate(), None);
}

#[test]
fn test_aggregate_single_is_unwrapped() {
    let mut errs = FieldErrorList::new();
    errs.push(FieldError::required(FieldPath::new("a"), "missing"));
    assert_eq!(errs.to_aggregate().as_deref(), Some("a: Required value: missing"));
}

#[test]
fn test_aggregate_many_is_bracketed_in_order() {
    let mut errs = FieldErrorList::new();
    errs.push(FieldError::required(FieldPath::new("a"), "first"));
    errs.push(FieldError::forbidden(FieldPath::new("b"), "second"));
    assert_eq!(errs.iter().count(), 2);
    assert_eq!(
        errs.to_aggregate().as_deref(),
        Some("[a: Required value: first, b: Forbidden: second]")
    );
}
