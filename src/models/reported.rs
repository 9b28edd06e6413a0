// Value-or-error wrapper for readers whose failures are reported to the client

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Serializes as the bare value on success and as `{"error": "..."}` on failure,
/// so an empty result (`[]`) stays distinguishable from a failed read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reported<T> {
    Error { error: String },
    Value(T),
}

impl<T> Reported<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Reported::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reported::Error { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reported::Value(v) => Some(v),
            Reported::Error { .. } => None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for Reported<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Reported::Value(v),
            Err(e) => Reported::error(e.to_string()),
        }
    }
}
