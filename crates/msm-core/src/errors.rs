//! Structured error types shared across MSM crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`MsmError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (sizes, positions, offending values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the MSM crates.
///
/// Every failure is a caller input error; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MsmError {
    /// Dimension mismatch between an operator and a vector or block.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Value outside the admissible domain (negative lag, non-stochastic rows).
    #[error("domain error: {0}")]
    Domain(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl MsmError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MsmError::Shape(info) | MsmError::Domain(info) | MsmError::Serde(info) => info,
        }
    }

    /// Builds a shape error reporting the expected and actual sizes of `what`.
    pub fn shape_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        MsmError::Shape(
            ErrorInfo::new(
                "shape-mismatch",
                format!("{what} has length {actual} but the operator has {expected} states"),
            )
            .with_context("argument", what)
            .with_context("expected", expected.to_string())
            .with_context("actual", actual.to_string()),
        )
    }

    /// Returns `true` for shape errors.
    pub fn is_shape(&self) -> bool {
        matches!(self, MsmError::Shape(_))
    }

    /// Returns `true` for domain errors.
    pub fn is_domain(&self) -> bool {
        matches!(self, MsmError::Domain(_))
    }
}
