// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `hostname.rs`

use super::*;

#[test]
fn test_valid_hostnames() {
    for host in ["example.com", "cafe.example.com", "a", "a-b.c-d.e", "*.example.com"] {
        assert!(validate_hostname(host).is_ok(), "{host} should be valid");
    }
}

#[test]
fn test_empty_hostname() {
    assert_eq!(validate_hostname(""), Err("cannot be empty string".to_string()));
}

#[test]
fn test_uppercase_and_underscore_rejected() {
    for host in ["Example.com", "bad_host.example.com", "-leading.example.com", "trailing-."] {
        let err = validate_hostname(host).unwrap_err();
        assert!(err.contains("lowercase RFC 1123 subdomain"), "{host}: {err}");
    }
}

#[test]
fn test_wildcard_must_be_leading_label() {
    for host in ["cafe.*.example.com", "*example.com", "**.example.com", "*"] {
        let err = validate_hostname(host).unwrap_err();
        assert!(err.contains("wildcard DNS-1123 subdomain"), "{host}: {err}");
    }
}

#[test]
fn test_too_long_reports_length() {
    let label = "a".repeat(63);
    let host = [label.as_str(); 5].join(".");
    assert!(host.len() > DNS1123_SUBDOMAIN_MAX_LENGTH);

    let err = validate_hostname(&host).unwrap_err();
    assert!(err.starts_with("must be no more than 253 characters"));
}
