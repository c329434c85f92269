// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status conditions produced by the graph validators.
//!
//! Validators return [`Condition`] values without timestamps or generations, so the
//! same input always yields the same conditions. A status writer turns them into
//! [`StatusCondition`]s with [`Condition::to_status`].
//!
//! # Example
//!
//! ```rust
//! use gateway_graph::conditions::listener_unsupported_value;
//!
//! let conds = listener_unsupported_value("port: Invalid value: 0: port must be between 1-65535");
//! assert_eq!(conds.len(), 2);
//! assert_eq!(conds[0].r#type, "Accepted");
//! assert_eq!(conds[1].r#type, "Programmed");
//! ```

use crate::crd::StatusCondition;
use crate::status_reasons::{
    CONDITION_STATUS_FALSE, CONDITION_STATUS_TRUE, CONDITION_TYPE_ACCEPTED,
    CONDITION_TYPE_CONFLICTED, CONDITION_TYPE_PROGRAMMED, CONDITION_TYPE_RESOLVED_REFS,
    REASON_ACCEPTED, REASON_HOSTNAME_CONFLICT, REASON_INVALID, REASON_INVALID_CERTIFICATE_REF,
    REASON_INVALID_ROUTE_KINDS, REASON_NO_CONFLICTS, REASON_PROGRAMMED, REASON_PROTOCOL_CONFLICT,
    REASON_REF_NOT_PERMITTED, REASON_RESOLVED_REFS, REASON_UNSUPPORTED_PROTOCOL,
    REASON_UNSUPPORTED_VALUE,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A status condition as computed by a validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    pub status: String,
    pub reason: String,
    pub message: String,
}

impl Condition {
    #[must_use]
    pub fn new(condition_type: &str, status: &str, reason: &str, message: impl Into<String>) -> Self {
        Self {
            r#type: condition_type.to_string(),
            status: status.to_string(),
            reason: reason.to_string(),
            message: message.into(),
        }
    }

    /// Stamp the condition for writing into a resource status.
    #[must_use]
    pub fn to_status(&self, observed_generation: Option<i64>, now: DateTime<Utc>) -> StatusCondition {
        StatusCondition {
            r#type: self.r#type.clone(),
            status: self.status.clone(),
            reason: self.reason.clone(),
            message: self.message.clone(),
            observed_generation,
            last_transition_time: Some(now.to_rfc3339()),
        }
    }
}

/// Collapse conditions so each type appears once.
///
/// The last condition of a type wins and takes the position of the first one.
#[must_use]
pub fn deduplicate_conditions(conds: Vec<Condition>) -> Vec<Condition> {
    let mut result: Vec<Condition> = Vec::with_capacity(conds.len());
    for cond in conds {
        match result.iter_mut().find(|c| c.r#type == cond.r#type) {
            Some(existing) => *existing = cond,
            None => result.push(cond),
        }
    }
    result
}

// ============================================================================
// Listener Conditions
// ============================================================================

/// `Programmed=False` companion of every listener rejection.
#[must_use]
pub fn listener_not_programmed_invalid(msg: &str) -> Condition {
    Condition::new(
        CONDITION_TYPE_PROGRAMMED,
        CONDITION_STATUS_FALSE,
        REASON_INVALID,
        msg,
    )
}

#[must_use]
pub fn listener_unsupported_value(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_UNSUPPORTED_VALUE,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

#[must_use]
pub fn listener_unsupported_protocol(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_UNSUPPORTED_PROTOCOL,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

/// Certificate reference could not be resolved.
#[must_use]
pub fn listener_invalid_certificate_ref(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_INVALID_CERTIFICATE_REF,
            msg,
        ),
        Condition::new(
            CONDITION_TYPE_RESOLVED_REFS,
            CONDITION_STATUS_FALSE,
            REASON_INVALID_CERTIFICATE_REF,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

/// Some allowed route kinds are unsupported; the listener stays accepted.
#[must_use]
pub fn listener_invalid_route_kinds(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_RESOLVED_REFS,
            CONDITION_STATUS_FALSE,
            REASON_INVALID_ROUTE_KINDS,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

#[must_use]
pub fn listener_ref_not_permitted(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_REF_NOT_PERMITTED,
            msg,
        ),
        Condition::new(
            CONDITION_TYPE_RESOLVED_REFS,
            CONDITION_STATUS_FALSE,
            REASON_REF_NOT_PERMITTED,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

#[must_use]
pub fn listener_protocol_conflict(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_PROTOCOL_CONFLICT,
            msg,
        ),
        Condition::new(
            CONDITION_TYPE_CONFLICTED,
            CONDITION_STATUS_TRUE,
            REASON_PROTOCOL_CONFLICT,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

#[must_use]
pub fn listener_hostname_conflict(msg: &str) -> Vec<Condition> {
    vec![
        Condition::new(
            CONDITION_TYPE_ACCEPTED,
            CONDITION_STATUS_FALSE,
            REASON_HOSTNAME_CONFLICT,
            msg,
        ),
        Condition::new(
            CONDITION_TYPE_CONFLICTED,
            CONDITION_STATUS_TRUE,
            REASON_HOSTNAME_CONFLICT,
            msg,
        ),
        listener_not_programmed_invalid(msg),
    ]
}

/// `Accepted=True` for a listener with no problems.
#[must_use]
pub fn listener_accepted() -> Condition {
    Condition::new(
        CONDITION_TYPE_ACCEPTED,
        CONDITION_STATUS_TRUE,
        REASON_ACCEPTED,
        "Listener is accepted",
    )
}

/// Conditions every listener starts with; failures overwrite them by type.
#[must_use]
pub fn listener_default_conditions() -> Vec<Condition> {
    vec![
        listener_accepted(),
        Condition::new(
            CONDITION_TYPE_PROGRAMMED,
            CONDITION_STATUS_TRUE,
            REASON_PROGRAMMED,
            "Listener is programmed",
        ),
        Condition::new(
            CONDITION_TYPE_RESOLVED_REFS,
            CONDITION_STATUS_TRUE,
            REASON_RESOLVED_REFS,
            "All references are resolved",
        ),
        Condition::new(
            CONDITION_TYPE_CONFLICTED,
            CONDITION_STATUS_FALSE,
            REASON_NO_CONFLICTS,
            "No conflicts",
        ),
    ]
}

// ============================================================================
// Policy and Filter Conditions
// ============================================================================

/// `Accepted=False` with reason `Invalid` for a `BackendTLSPolicy`.
#[must_use]
pub fn backend_tls_policy_invalid(msg: &str) -> Condition {
    Condition::new(
        CONDITION_TYPE_ACCEPTED,
        CONDITION_STATUS_FALSE,
        REASON_INVALID,
        msg,
    )
}

#[must_use]
pub fn backend_tls_policy_accepted() -> Condition {
    Condition::new(
        CONDITION_TYPE_ACCEPTED,
        CONDITION_STATUS_TRUE,
        REASON_ACCEPTED,
        "Policy is accepted",
    )
}

/// `Accepted=False` with reason `Invalid` for a `SnippetsFilter`.
#[must_use]
pub fn snippets_filter_invalid(msg: &str) -> Condition {
    Condition::new(
        CONDITION_TYPE_ACCEPTED,
        CONDITION_STATUS_FALSE,
        REASON_INVALID,
        msg,
    )
}

#[must_use]
pub fn snippets_filter_accepted() -> Condition {
    Condition::new(
        CONDITION_TYPE_ACCEPTED,
        CONDITION_STATUS_TRUE,
        REASON_ACCEPTED,
        "SnippetsFilter is accepted",
    )
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod conditions_tests;
