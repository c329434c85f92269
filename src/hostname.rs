// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS-1123 hostname validation.
//!
//! Hostnames are accepted when they are a lowercase RFC 1123 subdomain
//! (`cafe.example.com`) or a wildcard subdomain whose only wildcard is a leading
//! `*.` label (`*.example.com`). Failure messages match the Kubernetes API
//! machinery wording.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a DNS-1123 subdomain
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

const DNS1123_SUBDOMAIN_FMT: &str =
    r"[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*";

static DNS1123_SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DNS1123_SUBDOMAIN_FMT}$"))
        .expect("DNS-1123 subdomain regex is valid")
});

static WILDCARD_DNS1123_SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\*\.{DNS1123_SUBDOMAIN_FMT}$"))
        .expect("DNS-1123 subdomain regex is valid")
});

fn max_len_error() -> String {
    format!("must be no more than {DNS1123_SUBDOMAIN_MAX_LENGTH} characters")
}

/// Validate a lowercase RFC 1123 subdomain, returning every failure message.
#[must_use]
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errs.push(max_len_error());
    }
    if !DNS1123_SUBDOMAIN_RE.is_match(value) {
        errs.push(format!(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, \
             '-' or '.', and must start and end with an alphanumeric character \
             (e.g. 'example.com', regex used for validation is '{DNS1123_SUBDOMAIN_FMT}')"
        ));
    }
    errs
}

/// Validate a `*.`-prefixed wildcard subdomain, returning every failure message.
#[must_use]
pub fn is_wildcard_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errs.push(max_len_error());
    }
    if !WILDCARD_DNS1123_SUBDOMAIN_RE.is_match(value) {
        errs.push(format!(
            "a wildcard DNS-1123 subdomain must start with '*.', followed by a valid DNS subdomain, \
             which must consist of lower case alphanumeric characters, '-' or '.' and end with an \
             alphanumeric character (e.g. '*.example.com', regex used for validation is \
             '\\*\\.{DNS1123_SUBDOMAIN_FMT}')"
        ));
    }
    errs
}

/// Validate a hostname that may carry a leading wildcard label.
///
/// # Errors
///
/// Returns the joined failure messages when the hostname is empty or malformed.
pub fn validate_hostname(hostname: &str) -> Result<(), String> {
    if hostname.is_empty() {
        return Err("cannot be empty string".to_string());
    }

    let errs = if hostname.contains('*') {
        is_wildcard_dns1123_subdomain(hostname)
    } else {
        is_dns1123_subdomain(hostname)
    };

    if errs.is_empty() {
        Ok(())
    } else {
        Err(errs.join(", "))
    }
}

#[cfg(test)]
#[path = "hostname_tests.rs"]
mod hostname_tests;
