use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ContextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Application,
    Transport,
}

/// Failure classes a dispatch can end in. All of them are rendered to the
/// operator; none are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<ContextField> },
    #[error("{message}")]
    Application { message: String },
    #[error("{0}")]
    Transport(String),
}

impl PanelError {
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    pub fn transport(description: impl Into<String>) -> Self {
        Self::Transport(description.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PanelError::Validation { .. } => ErrorKind::Validation,
            PanelError::Application { .. } => ErrorKind::Application,
            PanelError::Transport(_) => ErrorKind::Transport,
        }
    }
}

fn join_fields(fields: &[ContextField]) -> String {
    fields
        .iter()
        .map(|field| field.wire_key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("action parameter `{0}` collides with a request context field")]
    ReservedKey(String),
    #[error("action parameter key must not be empty")]
    EmptyKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_missing_fields() {
        let err = PanelError::Validation {
            missing: vec![ContextField::Region, ContextField::BucketName],
        };
        assert_eq!(err.to_string(), "missing required fields: region, bucket_name");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn application_error_displays_backend_message() {
        let err = PanelError::application("Invalid policy");
        assert_eq!(err.to_string(), "Invalid policy");
        assert_eq!(err.kind(), ErrorKind::Application);
    }
}
