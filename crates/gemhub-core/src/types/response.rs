//! Transport-boundary result types.
//!
//! The routing layer is an external collaborator; it receives an
//! [`Outcome`] and picks a wire status from its [`StatusCategory`].

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Suggested status category for a normalized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCategory {
    /// The operation succeeded.
    Ok,
    /// The input was rejected before any mutation.
    BadInput,
    /// No caller identity was supplied.
    Unauthorized,
    /// The caller's role does not allow the operation.
    Forbidden,
    /// A referenced document does not exist.
    NotFound,
    /// A uniqueness or hierarchy constraint blocked the operation.
    Conflict,
    /// A dependency or internal failure.
    ServerError,
}

impl StatusCategory {
    /// Return the category as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadInput => "bad-input",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not-found",
            Self::Conflict => "conflict",
            Self::ServerError => "server-error",
        }
    }
}

/// A value produced by an operation that ran compensating actions.
///
/// An empty `warnings` list means the operation applied cleanly. A
/// non-empty list means the primary change was applied but some
/// secondary cleanup failed and needs operator follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion<T> {
    /// The operation's result.
    pub value: T,
    /// Failures of secondary cleanup steps.
    pub warnings: Vec<String>,
}

impl<T> Completion<T> {
    /// A completion with no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A completion carrying the given warnings.
    pub fn with_warnings(value: T, warnings: Vec<String>) -> Self {
        Self { value, warnings }
    }

    /// Whether some cleanup step failed.
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Normalized result handed to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Whether the operation applied.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Suggested status category.
    pub status: StatusCategory,
    /// Warnings from a partially applied operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    /// A successful outcome.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: StatusCategory::Ok,
            warnings: Vec::new(),
        }
    }

    /// A failed outcome. Nothing was changed.
    pub fn failed(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.message.clone()),
            status: err.status_category(),
            warnings: Vec::new(),
        }
    }

    /// Build an outcome from a plain result.
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(&e),
        }
    }

    /// Build an outcome from a result that may carry warnings.
    pub fn from_completion(result: AppResult<Completion<T>>) -> Self {
        match result {
            Ok(done) => Self {
                warnings: done.warnings,
                ..Self::ok(done.value)
            },
            Err(e) => Self::failed(&e),
        }
    }

    /// Whether the operation applied but left cleanup warnings.
    pub fn is_partial(&self) -> bool {
        self.success && !self.warnings.is_empty()
    }
}
