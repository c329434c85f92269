// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for graph error types.

use super::*;

#[test]
fn test_not_found_error() {
    let err = ResolveError::NotFound { kind: "ConfigMap" };
    assert_eq!(err.to_string(), "ConfigMap does not exist");
}

#[test]
fn test_malformed_error() {
    let err = ResolveError::Malformed {
        reason: "secret type must be \"kubernetes.io/tls\" not \"Opaque\"".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "secret type must be \"kubernetes.io/tls\" not \"Opaque\""
    );
}

#[test]
fn test_certificate_error_is_transparent() {
    let cert_err = CertificateError::InvalidCaCert {
        reason: "failed to validate certificate: bad der".to_string(),
    };
    let err: ResolveError = cert_err.clone().into();

    assert_eq!(err.to_string(), cert_err.to_string());
    assert_eq!(err, ResolveError::Certificate(cert_err));
}

#[test]
fn test_invalid_key_pair_message() {
    let err = CertificateError::InvalidKeyPair {
        reason: "private key does not match public key".to_string(),
    };
    assert_eq!(err.to_string(), "tls: private key does not match public key");
}

#[test]
fn test_capacity_error_message() {
    let err = CapacityError { count: 16, max: 16 };
    assert_eq!(
        err.to_string(),
        "too many ancestors (16 of 16), cannot attach a new Gateway"
    );
}
