// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `SnippetsFilter` validation and extension-ref resolution.
//!
//! A filter must hold at least one snippet. Each snippet needs a non-empty value and
//! a supported context, and each context may be used once. Every failure across all
//! snippets is collected and reported in a single `Accepted=False` condition.

use crate::conditions::{snippets_filter_invalid, Condition};
use crate::constants::{KIND_SNIPPETS_FILTER, NGINX_GATEWAY_API_GROUP};
use crate::crd::{self, LocalObjectReference, NginxContext};
use crate::field_errors::{FieldError, FieldErrorList, FieldPath};
use crate::types::NamespacedName;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A `SnippetsFilter` after validation.
#[derive(Clone, Debug, Serialize)]
pub struct SnippetsFilter {
    pub source: crd::SnippetsFilter,
    /// Snippet per context; empty for an invalid filter
    pub snippets: BTreeMap<NginxContext, String>,
    pub conditions: Vec<Condition>,
    pub valid: bool,
    /// A route references this filter
    pub referenced: bool,
}

/// A route filter resolved to a `SnippetsFilter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionRefFilter {
    pub snippets_filter: NamespacedName,
    pub valid: bool,
}

/// Validate every `SnippetsFilter` in the snapshot.
#[must_use]
pub fn process_snippets_filters(
    filters: &BTreeMap<NamespacedName, crd::SnippetsFilter>,
) -> BTreeMap<NamespacedName, SnippetsFilter> {
    filters
        .iter()
        .map(|(nsname, filter)| {
            let processed = match validate_snippets_filter(filter) {
                Some(cond) => SnippetsFilter {
                    source: filter.clone(),
                    snippets: BTreeMap::new(),
                    conditions: vec![cond],
                    valid: false,
                    referenced: false,
                },
                None => SnippetsFilter {
                    source: filter.clone(),
                    snippets: snippets_map(&filter.spec.snippets),
                    conditions: Vec::new(),
                    valid: true,
                    referenced: false,
                },
            };
            (nsname.clone(), processed)
        })
        .collect()
}

fn snippets_map(snippets: &[crd::Snippet]) -> BTreeMap<NginxContext, String> {
    snippets
        .iter()
        .filter_map(|snippet| {
            NginxContext::parse(&snippet.context).map(|ctx| (ctx, snippet.value.clone()))
        })
        .collect()
}

/// Validate a filter, returning the `Accepted=False` condition when it is invalid.
#[must_use]
pub fn validate_snippets_filter(filter: &crd::SnippetsFilter) -> Option<Condition> {
    snippets_filter_errors(filter)
        .to_aggregate()
        .map(|msg| snippets_filter_invalid(&msg))
}

/// Every problem with a filter's snippets, in snippet order.
#[must_use]
pub fn snippets_filter_errors(filter: &crd::SnippetsFilter) -> FieldErrorList {
    let mut errs = FieldErrorList::new();
    let snippets_path = FieldPath::new("spec").child("snippets");

    if filter.spec.snippets.is_empty() {
        errs.push(FieldError::required(
            snippets_path,
            "at least one snippet must be provided",
        ));
        return errs;
    }

    let supported: Vec<&str> = NginxContext::ALL.iter().map(|ctx| ctx.as_str()).collect();
    let mut used_contexts = BTreeSet::new();

    for (i, snippet) in filter.spec.snippets.iter().enumerate() {
        let snippet_path = snippets_path.index(i);

        if snippet.value.is_empty() {
            errs.push(FieldError::required(
                snippet_path.child("value"),
                "value cannot be empty",
            ));
        }

        let ctx_path = snippet_path.child("context");
        if NginxContext::parse(&snippet.context).is_none() {
            errs.push(FieldError::not_supported(
                ctx_path.clone(),
                &snippet.context,
                &supported,
            ));
        }

        if !used_contexts.insert(snippet.context.as_str()) {
            errs.push(FieldError::invalid(
                ctx_path,
                &snippet.context,
                "only one snippet is allowed per context",
            ));
        }
    }

    errs
}

/// Resolve a route's extension ref to a `SnippetsFilter` in the route's namespace.
///
/// Returns `None` for refs to other kinds or to missing filters. A resolved filter is
/// marked as referenced.
pub fn resolve_extension_ref(
    filters: &mut BTreeMap<NamespacedName, SnippetsFilter>,
    namespace: &str,
    ext_ref: &LocalObjectReference,
) -> Option<ExtensionRefFilter> {
    if ext_ref.group != NGINX_GATEWAY_API_GROUP || ext_ref.kind != KIND_SNIPPETS_FILTER {
        return None;
    }

    let nsname = NamespacedName::new(namespace, ext_ref.name.as_str());
    let filter = filters.get_mut(&nsname)?;
    filter.referenced = true;

    Some(ExtensionRefFilter {
        snippets_filter: nsname,
        valid: filter.valid,
    })
}
