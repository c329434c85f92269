// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Gateway API status condition types and reasons.
//!
//! This module defines constants for condition types and reasons following Gateway API
//! conventions. Reasons are programmatic identifiers in CamelCase that explain why a
//! condition has a particular status.
//!
//! # Condition Types
//!
//! - **Listeners** report `Accepted`, `Programmed`, `ResolvedRefs`, and `Conflicted`.
//! - **Policies** and **filters** report a single `Accepted` condition.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   listeners:
//!     - name: https
//!       conditions:
//!         - type: Accepted
//!           status: "True"
//!           reason: Accepted
//!         - type: ResolvedRefs
//!           status: "False"
//!           reason: InvalidCertificateRef
//!           message: "Secret does not exist"
//!         - type: Programmed
//!           status: "False"
//!           reason: Invalid
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// The resource is syntactically and semantically valid and was accepted.
pub const CONDITION_TYPE_ACCEPTED: &str = "Accepted";

/// The resource has been programmed into the data plane.
pub const CONDITION_TYPE_PROGRAMMED: &str = "Programmed";

/// All references held by the resource resolved to valid objects.
pub const CONDITION_TYPE_RESOLVED_REFS: &str = "ResolvedRefs";

/// The listener conflicts with another listener of the same Gateway.
pub const CONDITION_TYPE_CONFLICTED: &str = "Conflicted";

// ============================================================================
// Condition Status Values
// ============================================================================

pub const CONDITION_STATUS_TRUE: &str = "True";

pub const CONDITION_STATUS_FALSE: &str = "False";

// ============================================================================
// Common Reasons
// ============================================================================

/// The resource was accepted.
pub const REASON_ACCEPTED: &str = "Accepted";

/// The resource was programmed into the data plane.
pub const REASON_PROGRAMMED: &str = "Programmed";

/// The resource is invalid.
///
/// Used for `Accepted=False` on policies and filters, and for `Programmed=False`
/// whenever a listener is not accepted.
pub const REASON_INVALID: &str = "Invalid";

// ============================================================================
// Listener Reasons
// ============================================================================

/// A listener field holds a value the implementation does not support.
///
/// **Usage:**
/// - Out-of-range or protected ports
/// - Bad hostnames or label selectors
/// - TLS settings incompatible with the protocol
pub const REASON_UNSUPPORTED_VALUE: &str = "UnsupportedValue";

/// The listener's protocol is not supported.
pub const REASON_UNSUPPORTED_PROTOCOL: &str = "UnsupportedProtocol";

/// A certificate reference is missing, malformed, or points to an invalid Secret.
pub const REASON_INVALID_CERTIFICATE_REF: &str = "InvalidCertificateRef";

/// A route kind in `allowedRoutes.kinds` is not supported for the listener's protocol.
pub const REASON_INVALID_ROUTE_KINDS: &str = "InvalidRouteKinds";

/// A reference crosses namespaces without being permitted.
pub const REASON_REF_NOT_PERMITTED: &str = "RefNotPermitted";

/// Listeners on the same port declare incompatible protocols.
pub const REASON_PROTOCOL_CONFLICT: &str = "ProtocolConflict";

/// Secure listeners on the same port declare overlapping hostnames.
pub const REASON_HOSTNAME_CONFLICT: &str = "HostnameConflict";

/// All references held by the listener resolved.
pub const REASON_RESOLVED_REFS: &str = "ResolvedRefs";

/// The listener does not conflict with any other listener.
pub const REASON_NO_CONFLICTS: &str = "NoConflicts";
