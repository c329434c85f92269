// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Structured field validation errors.
//!
//! Validators describe every failure as a [`FieldError`]: the path of the offending
//! field, what kind of failure it is, and the detail. Errors are collected in an
//! ordered [`FieldErrorList`] and only rendered to text when they are placed into a
//! status condition, so tests can assert on the structured data.
//!
//! The rendered text follows the Kubernetes API machinery layout so that messages
//! read the same way as those produced by the API server:
//!
//! ```text
//! tls.certificateRefs[0].kind: Unsupported value: "Service": supported values: "Secret"
//! port: Invalid value: 0: port must be between 1-65535
//! [spec.snippets[0].value: Required value: value cannot be empty, spec.snippets[1].context: ...]
//! ```

use std::fmt;
use thiserror::Error;

/// Dotted path to a field, with list indices in brackets (`spec.snippets[2].context`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Start a path at the given root segment.
    #[must_use]
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    /// Descend into a named child field.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// Descend into a list element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Machine-matchable category of a [`FieldError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldErrorKind {
    Invalid,
    Required,
    NotSupported,
    Forbidden,
    TooMany,
}

impl FieldErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Required => "Required",
            Self::NotSupported => "NotSupported",
            Self::Forbidden => "Forbidden",
            Self::TooMany => "TooMany",
        }
    }
}

/// A single validation failure attributed to a field.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The field holds a value that fails validation.
    ///
    /// `value` is already rendered: strings are quoted, numbers are not.
    #[error("{path}: Invalid value: {value}: {detail}")]
    Invalid {
        path: FieldPath,
        value: String,
        detail: String,
    },

    /// A required field is missing or empty.
    #[error("{path}: Required value: {detail}")]
    Required { path: FieldPath, detail: String },

    /// The field holds a value outside a fixed set of legal values.
    #[error("{path}: Unsupported value: {value:?}: supported values: {}", quote_all(.supported))]
    NotSupported {
        path: FieldPath,
        value: String,
        supported: Vec<String>,
    },

    /// The field must not be set.
    #[error("{path}: Forbidden: {detail}")]
    Forbidden { path: FieldPath, detail: String },

    /// The list holds more items than allowed.
    #[error("{path}: Too many: {actual}: must have at most {max} items")]
    TooMany {
        path: FieldPath,
        actual: usize,
        max: usize,
    },
}

fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FieldError {
    /// `Invalid` error for a string value; the value is quoted in the message.
    #[must_use]
    pub fn invalid(path: FieldPath, value: &str, detail: impl Into<String>) -> Self {
        Self::Invalid {
            path,
            value: format!("{value:?}"),
            detail: detail.into(),
        }
    }

    /// `Invalid` error for a value that is rendered as-is (numbers, references).
    #[must_use]
    pub fn invalid_raw(path: FieldPath, value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::Invalid {
            path,
            value: value.to_string(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn required(path: FieldPath, detail: impl Into<String>) -> Self {
        Self::Required {
            path,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn not_supported(path: FieldPath, value: &str, supported: &[&str]) -> Self {
        Self::NotSupported {
            path,
            value: value.to_string(),
            supported: supported.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn forbidden(path: FieldPath, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            path,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn too_many(path: FieldPath, actual: usize, max: usize) -> Self {
        Self::TooMany { path, actual, max }
    }

    #[must_use]
    pub fn kind(&self) -> FieldErrorKind {
        match self {
            Self::Invalid { .. } => FieldErrorKind::Invalid,
            Self::Required { .. } => FieldErrorKind::Required,
            Self::NotSupported { .. } => FieldErrorKind::NotSupported,
            Self::Forbidden { .. } => FieldErrorKind::Forbidden,
            Self::TooMany { .. } => FieldErrorKind::TooMany,
        }
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Invalid { path, .. }
            | Self::Required { path, .. }
            | Self::NotSupported { path, .. }
            | Self::Forbidden { path, .. }
            | Self::TooMany { path, .. } => path,
        }
    }
}

/// Ordered collection of field errors, first found first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrorList(Vec<FieldError>);

impl FieldErrorList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Render the list as a single message, or `None` when there are no errors.
    ///
    /// A single error is rendered unwrapped; several are bracketed and comma-joined.
    #[must_use]
    pub fn to_aggregate(&self) -> Option<String> {
        match self.0.as_slice() {
            [] => None,
            [single] => Some(single.to_string()),
            many => Some(format!(
                "[{}]",
                many.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
#[path = "field_errors_tests.rs"]
mod field_errors_tests;
