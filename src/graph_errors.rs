// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reference resolution and certificate error types.
//!
//! This module provides specialized error types for:
//! - Resolving a namespaced reference to a Secret or ConfigMap
//! - Validating TLS key pairs and CA certificates held by those objects
//!
//! Resolution errors never abort a graph build. The caller converts them into a
//! status condition on the resource that holds the reference.

use thiserror::Error;

/// Errors produced while validating certificate material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// The TLS certificate and private key do not form a usable key pair.
    ///
    /// Either side failed to parse, or the certificate's public key does not
    /// belong to the private key.
    #[error("tls: {reason}")]
    InvalidKeyPair {
        /// What went wrong while loading the pair
        reason: String,
    },

    /// The CA certificate data is not a single parseable `CERTIFICATE` PEM block.
    #[error("{reason}")]
    InvalidCaCert {
        /// Embeds the offending PEM type or the X.509 parse error
        reason: String,
    },
}

/// Errors produced when resolving a reference to a cluster object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The referenced object is absent from the snapshot.
    #[error("{kind} does not exist")]
    NotFound {
        /// Kind of the missing object (e.g. `Secret`, `ConfigMap`)
        kind: &'static str,
    },

    /// The object exists but has the wrong type or shape.
    #[error("{reason}")]
    Malformed {
        /// Explanation of what is wrong with the object
        reason: String,
    },

    /// The object holds certificate data that failed validation.
    #[error(transparent)]
    Certificate(#[from] CertificateError),
}

/// Error raised when a policy cannot be attached because its ancestor list is full.
///
/// Never surfaced as a condition: another controller already owns status
/// reporting for the policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("too many ancestors ({count} of {max}), cannot attach a new Gateway")]
pub struct CapacityError {
    pub count: usize,
    pub max: usize,
}

#[cfg(test)]
#[path = "graph_errors_tests.rs"]
mod graph_errors_tests;
