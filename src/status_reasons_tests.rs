// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status_reasons` module

#[cfg(test)]
mod tests {
    use crate::status_reasons::*;

    // ============================================================================
    // Test Condition Types
    // ============================================================================

    #[test]
    fn test_listener_condition_types() {
        assert_eq!(CONDITION_TYPE_ACCEPTED, "Accepted");
        assert_eq!(CONDITION_TYPE_PROGRAMMED, "Programmed");
        assert_eq!(CONDITION_TYPE_RESOLVED_REFS, "ResolvedRefs");
        assert_eq!(CONDITION_TYPE_CONFLICTED, "Conflicted");
    }

    #[test]
    fn test_condition_status_values() {
        assert_eq!(CONDITION_STATUS_TRUE, "True");
        assert_eq!(CONDITION_STATUS_FALSE, "False");
    }

    // ============================================================================
    // Test Listener Reasons
    // ============================================================================

    #[test]
    fn test_listener_reasons_are_gateway_api_names() {
        assert_eq!(REASON_UNSUPPORTED_VALUE, "UnsupportedValue");
        assert_eq!(REASON_UNSUPPORTED_PROTOCOL, "UnsupportedProtocol");
        assert_eq!(REASON_INVALID_CERTIFICATE_REF, "InvalidCertificateRef");
        assert_eq!(REASON_INVALID_ROUTE_KINDS, "InvalidRouteKinds");
        assert_eq!(REASON_REF_NOT_PERMITTED, "RefNotPermitted");
        assert_eq!(REASON_PROTOCOL_CONFLICT, "ProtocolConflict");
        assert_eq!(REASON_HOSTNAME_CONFLICT, "HostnameConflict");
    }

    #[test]
    fn test_reason_invalid_shared_by_policies_and_listeners() {
        assert_eq!(REASON_INVALID, "Invalid");
        assert_ne!(REASON_INVALID, REASON_ACCEPTED);
    }
}
