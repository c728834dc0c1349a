use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a single call mirrored to the map controller.
///
/// Callers are free to discard it; it exists so each call site's outcome can be
/// inspected and logged rather than silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum MirrorOutcome {
    Ok,
    Failed(String),
}

impl MirrorOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for MirrorOutcome {
    fn from(value: Result<(), E>) -> Self {
        match value {
            Ok(()) => Self::Ok,
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("map controller is not available")]
    ControllerUnavailable,
    #[error("map controller failed to initialize: {0}")]
    EmbedRejected(String),
}
