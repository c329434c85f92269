// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `resolver.rs`

use super::*;
use crate::graph_errors::CertificateError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use rcgen::{generate_simple_self_signed, CertifiedKey};
use std::cell::Cell;

fn self_signed() -> CertifiedKey {
    generate_simple_self_signed(vec!["example.com".to_string()]).unwrap()
}

fn meta(name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some("test".to_string()),
        ..Default::default()
    }
}

fn tls_secret(name: &str, cert: &str, key: &str, ca: Option<&str>) -> Secret {
    let mut data = BTreeMap::new();
    data.insert(TLS_CERT_KEY.to_string(), ByteString(cert.as_bytes().to_vec()));
    data.insert(
        TLS_PRIVATE_KEY_KEY.to_string(),
        ByteString(key.as_bytes().to_vec()),
    );
    if let Some(ca) = ca {
        data.insert(CA_CERT_KEY.to_string(), ByteString(ca.as_bytes().to_vec()));
    }
    Secret {
        metadata: meta(name),
        type_: Some(SECRET_TYPE_TLS.to_string()),
        data: Some(data),
        ..Default::default()
    }
}

fn ca_config_map(name: &str, data: Option<&str>, binary: Option<&[u8]>) -> ConfigMap {
    ConfigMap {
        metadata: meta(name),
        data: data.map(|d| BTreeMap::from([(CA_CERT_KEY.to_string(), d.to_string())])),
        binary_data: binary
            .map(|b| BTreeMap::from([(CA_CERT_KEY.to_string(), ByteString(b.to_vec()))])),
        ..Default::default()
    }
}

fn nsname(name: &str) -> NamespacedName {
    NamespacedName::new("test", name)
}

#[test]
fn test_secret_valid() {
    let certified = self_signed();
    let secrets = BTreeMap::from([(
        nsname("secret"),
        tls_secret(
            "secret",
            &certified.cert.pem(),
            &certified.key_pair.serialize_pem(),
            None,
        ),
    )]);
    let mut resolver = SecretResolver::new(&secrets);

    assert!(resolver.resolve(&nsname("secret")).is_ok());

    let resolved = resolver.get(&nsname("secret")).unwrap();
    let bundle = resolved.cert_bundle.as_ref().unwrap();
    assert_eq!(bundle.kind, KIND_SECRET);
    assert_eq!(bundle.name, nsname("secret"));
    assert!(bundle.cert.ca_cert.is_empty());
}

#[test]
fn test_secret_not_found() {
    let secrets = BTreeMap::new();
    let mut resolver = SecretResolver::new(&secrets);

    let err = resolver.resolve(&nsname("missing")).unwrap_err();
    assert_eq!(err, ResolveError::NotFound { kind: "Secret" });
    assert_eq!(err.to_string(), "Secret does not exist");

    let resolved = resolver.resolved();
    assert!(resolved[&nsname("missing")].source.is_none());
}

#[test]
fn test_secret_wrong_type() {
    let certified = self_signed();
    let mut secret = tls_secret(
        "opaque",
        &certified.cert.pem(),
        &certified.key_pair.serialize_pem(),
        None,
    );
    secret.type_ = Some("Opaque".to_string());
    let secrets = BTreeMap::from([(nsname("opaque"), secret)]);
    let mut resolver = SecretResolver::new(&secrets);

    let err = resolver.resolve(&nsname("opaque")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "secret type must be \"kubernetes.io/tls\" not \"Opaque\""
    );

    let resolved = resolver.get(&nsname("opaque")).unwrap();
    assert!(resolved.source.is_some());
    assert!(resolved.cert_bundle.is_none());
}

#[test]
fn test_secret_invalid_key_pair_retains_source() {
    let first = self_signed();
    let second = self_signed();
    let secrets = BTreeMap::from([(
        nsname("mismatch"),
        tls_secret(
            "mismatch",
            &first.cert.pem(),
            &second.key_pair.serialize_pem(),
            None,
        ),
    )]);
    let mut resolver = SecretResolver::new(&secrets);

    let err = resolver.resolve(&nsname("mismatch")).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Certificate(CertificateError::InvalidKeyPair { .. })
    ));
    assert!(resolver.get(&nsname("mismatch")).unwrap().source.is_some());
}

#[test]
fn test_secret_invalid_ca() {
    let certified = self_signed();
    let secrets = BTreeMap::from([(
        nsname("bad-ca"),
        tls_secret(
            "bad-ca",
            &certified.cert.pem(),
            &certified.key_pair.serialize_pem(),
            Some("invalid"),
        ),
    )]);
    let mut resolver = SecretResolver::new(&secrets);

    let err = resolver.resolve(&nsname("bad-ca")).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Certificate(CertificateError::InvalidCaCert { .. })
    ));
}

#[test]
fn test_config_map_data_and_binary_data() {
    let ca = self_signed().cert.pem();
    let config_maps = BTreeMap::from([
        (nsname("plain"), ca_config_map("plain", Some(&ca), None)),
        (
            nsname("binary"),
            ca_config_map("binary", None, Some(ca.as_bytes())),
        ),
    ]);
    let mut resolver = ConfigMapResolver::new(&config_maps);

    assert!(resolver.resolve(&nsname("plain")).is_ok());
    assert!(resolver.resolve(&nsname("binary")).is_ok());

    let bundle = resolver
        .get(&nsname("binary"))
        .and_then(|r| r.cert_bundle.as_ref())
        .unwrap();
    assert_eq!(bundle.kind, KIND_CONFIG_MAP);
    assert_eq!(bundle.cert.ca_cert, ca.as_bytes());
}

#[test]
fn test_config_map_binary_data_wins() {
    let ca = self_signed().cert.pem();
    let config_maps = BTreeMap::from([(
        nsname("both"),
        ca_config_map("both", Some("invalid"), Some(ca.as_bytes())),
    )]);
    let mut resolver = ConfigMapResolver::new(&config_maps);

    assert!(resolver.resolve(&nsname("both")).is_ok());
}

#[test]
fn test_config_map_missing_ca_key() {
    let config_maps = BTreeMap::from([(nsname("empty"), ca_config_map("empty", None, None))]);
    let mut resolver = ConfigMapResolver::new(&config_maps);

    let err = resolver.resolve(&nsname("empty")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ConfigMap does not have the data or binaryData field ca.crt"
    );
}

#[test]
fn test_config_map_empty_ca_entries() {
    let ca = self_signed().cert.pem();
    let config_maps = BTreeMap::from([
        (nsname("empty"), ca_config_map("empty", Some(""), Some(&b""[..]))),
        (
            nsname("empty-binary"),
            ca_config_map("empty-binary", Some(&ca), Some(&b""[..])),
        ),
    ]);
    let mut resolver = ConfigMapResolver::new(&config_maps);

    let err = resolver.resolve(&nsname("empty")).unwrap_err();
    assert!(matches!(err, ResolveError::Malformed { .. }));
    assert_eq!(
        err.to_string(),
        "ConfigMap does not have the data or binaryData field ca.crt"
    );

    assert!(resolver.resolve(&nsname("empty-binary")).is_ok());
}

#[derive(Default)]
struct CountingKind {
    calls: Cell<usize>,
}

impl ResolvableKind for CountingKind {
    const KIND: &'static str = KIND_CONFIG_MAP;
    type Object = ConfigMap;

    fn certificate_bundle(
        &self,
        nsname: &NamespacedName,
        obj: &ConfigMap,
    ) -> Result<CertificateBundle, ResolveError> {
        self.calls.set(self.calls.get() + 1);
        ConfigMapKind.certificate_bundle(nsname, obj)
    }
}

#[test]
fn test_resolve_is_memoized() {
    let config_maps = BTreeMap::from([(
        nsname("bad"),
        ca_config_map("bad", Some("invalid"), None),
    )]);
    let mut resolver = Resolver::<CountingKind>::new(&config_maps);

    let first = resolver.resolve(&nsname("bad")).unwrap_err();
    let second = resolver.resolve(&nsname("bad")).unwrap_err();

    assert_eq!(first, second);
    assert_eq!(resolver.kind.calls.get(), 1);
}

#[test]
fn test_resolved_snapshot_is_detached() {
    let ca = self_signed().cert.pem();
    let config_maps = BTreeMap::from([(nsname("cm"), ca_config_map("cm", Some(&ca), None))]);
    let mut resolver = ConfigMapResolver::new(&config_maps);
    resolver.resolve(&nsname("cm")).unwrap();

    let mut snapshot = resolver.resolved();
    snapshot.clear();

    assert_eq!(resolver.resolved().len(), 1);
    assert!(resolver.get(&nsname("cm")).unwrap().cert_bundle.is_some());
}
