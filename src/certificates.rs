// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Certificate bundle validation.
//!
//! Validates the certificate material held by TLS Secrets and CA ConfigMaps:
//!
//! - A TLS certificate + private key pair must parse and belong together
//! - CA data must be a `CERTIFICATE` PEM block holding a parseable X.509 certificate,
//!   either stored as-is or base64-encoded
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_graph::certificates::validate_ca;
//!
//! let pem = std::fs::read("ca.crt").unwrap();
//! validate_ca(&pem).unwrap();
//! ```

use crate::constants::{CA_CERT_KEY, PEM_TYPE_CERTIFICATE};
use crate::graph_errors::CertificateError;
use crate::types::NamespacedName;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, Ed25519KeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use rustls::pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer};
use serde::Serialize;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::{FromDer, X509Certificate};

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_ED25519: &str = "1.3.101.112";

/// Raw certificate material extracted from a Secret or ConfigMap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Certificate {
    /// PEM-encoded serving certificate (empty for CA-only bundles)
    pub tls_cert: Vec<u8>,
    /// PEM-encoded private key (empty for CA-only bundles)
    pub tls_private_key: Vec<u8>,
    /// CA certificate data, PEM or base64-encoded PEM
    pub ca_cert: Vec<u8>,
}

/// Validated certificate material together with the object it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificateBundle {
    pub name: NamespacedName,
    pub kind: String,
    pub cert: Certificate,
}

impl CertificateBundle {
    #[must_use]
    pub fn new(name: NamespacedName, kind: &str, cert: Certificate) -> Self {
        Self {
            name,
            kind: kind.to_string(),
            cert,
        }
    }
}

/// Validate CA certificate data.
///
/// The data is first decoded as base64 (line breaks ignored); when that fails it is
/// used as-is. The first PEM block must be a `CERTIFICATE` holding a parseable
/// X.509 certificate.
///
/// # Errors
///
/// Returns [`CertificateError::InvalidCaCert`] when no PEM block is present, the block
/// has another type, or the certificate does not parse.
pub fn validate_ca(ca_data: &[u8]) -> Result<(), CertificateError> {
    let stripped: Vec<u8> = ca_data
        .iter()
        .copied()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();
    let data = BASE64.decode(&stripped).unwrap_or_else(|_| ca_data.to_vec());

    let Ok((_, pem)) = parse_x509_pem(&data) else {
        return Err(CertificateError::InvalidCaCert {
            reason: format!(
                "the data field {CA_CERT_KEY} must hold a valid {PEM_TYPE_CERTIFICATE} PEM block"
            ),
        });
    };

    if pem.label != PEM_TYPE_CERTIFICATE {
        return Err(CertificateError::InvalidCaCert {
            reason: format!(
                "the data field {CA_CERT_KEY} must hold a valid {PEM_TYPE_CERTIFICATE} PEM block, but got '{}'",
                pem.label
            ),
        });
    }

    X509Certificate::from_der(&pem.contents).map_err(|e| CertificateError::InvalidCaCert {
        reason: format!("failed to validate certificate: {e}"),
    })?;

    Ok(())
}

/// Validate that a PEM certificate and PEM private key form a key pair.
///
/// RSA, ECDSA (P-256, P-384) and Ed25519 keys are checked against the certificate's
/// public key. SEC1-encoded EC keys and other algorithms are accepted once both
/// sides parse.
///
/// # Errors
///
/// Returns [`CertificateError::InvalidKeyPair`] when either side fails to parse or the
/// key does not belong to the certificate.
pub fn validate_tls(tls_cert: &[u8], tls_private_key: &[u8]) -> Result<(), CertificateError> {
    let cert_der = CertificateDer::pem_slice_iter(tls_cert)
        .next()
        .ok_or_else(|| key_pair_error("failed to find any PEM data in certificate input"))?
        .map_err(|e| key_pair_error(format!("failed to parse certificate PEM: {e}")))?;

    let (_, cert) = X509Certificate::from_der(cert_der.as_ref())
        .map_err(|e| key_pair_error(format!("failed to parse certificate: {e}")))?;

    let private_key = PrivateKeyDer::from_pem_slice(tls_private_key)
        .map_err(|e| key_pair_error(format!("failed to parse private key: {e}")))?;

    let spki = cert.public_key();
    let algorithm_oid = spki.algorithm.algorithm.to_id_string();
    let public_key: &[u8] = spki.subject_public_key.data.as_ref();

    enforce_public_key_match(&algorithm_oid, public_key, &private_key)
}

/// Validate a TLS key pair and, when present, its CA certificate.
///
/// The key-pair check runs first, so its error wins when both parts are invalid.
///
/// # Errors
///
/// Returns the first [`CertificateError`] found.
pub fn validate_certificate_bundle(cert: &Certificate) -> Result<(), CertificateError> {
    validate_tls(&cert.tls_cert, &cert.tls_private_key)?;
    if !cert.ca_cert.is_empty() {
        validate_ca(&cert.ca_cert)?;
    }
    Ok(())
}

fn key_pair_error(reason: impl Into<String>) -> CertificateError {
    CertificateError::InvalidKeyPair {
        reason: reason.into(),
    }
}

fn key_mismatch() -> CertificateError {
    key_pair_error("private key does not match public key")
}

fn type_mismatch() -> CertificateError {
    key_pair_error("private key type does not match public key type")
}

fn compare_bytes(expected: &[u8], actual: &[u8]) -> Result<(), CertificateError> {
    if expected == actual {
        Ok(())
    } else {
        Err(key_mismatch())
    }
}

fn enforce_public_key_match(
    algorithm_oid: &str,
    public_key: &[u8],
    private_key: &PrivateKeyDer<'_>,
) -> Result<(), CertificateError> {
    // ring only reads PKCS#8 and PKCS#1
    if matches!(private_key, PrivateKeyDer::Sec1(_)) {
        return Ok(());
    }
    let key_bytes = private_key.secret_der();

    match algorithm_oid {
        OID_ED25519 => {
            let key_pair =
                Ed25519KeyPair::from_pkcs8_maybe_unchecked(key_bytes).map_err(|_| type_mismatch())?;
            compare_bytes(key_pair.public_key().as_ref(), public_key)
        }
        OID_EC_PUBLIC_KEY => {
            let rng = SystemRandom::new();
            if let Ok(key_pair) =
                EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, key_bytes, &rng)
            {
                return compare_bytes(key_pair.public_key().as_ref(), public_key);
            }
            if let Ok(key_pair) =
                EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, key_bytes, &rng)
            {
                return compare_bytes(key_pair.public_key().as_ref(), public_key);
            }
            Err(type_mismatch())
        }
        OID_RSA_ENCRYPTION => {
            let key_pair = match private_key {
                PrivateKeyDer::Pkcs1(_) => RsaKeyPair::from_der(key_bytes),
                _ => RsaKeyPair::from_pkcs8(key_bytes),
            }
            .map_err(|_| type_mismatch())?;
            compare_bytes(key_pair.public_key().as_ref(), public_key)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "certificates_tests.rs"]
mod certificates_tests;
