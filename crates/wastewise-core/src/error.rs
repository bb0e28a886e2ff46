use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed field check, shaped like a schema-validation issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WasteError {
    #[error("not initialized: run 'wastewise init'")]
    NotInitialized,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("product out of stock: {0}")]
    OutOfStock(String),

    #[error("Insufficient eco points")]
    InsufficientPoints { available: i64, required: i64 },

    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("coach backend error: {0}")]
    Coach(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, WasteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_every_field() {
        let err = WasteError::Validation(vec![
            FieldError::new("kitchen_kg", "must be at most 10"),
            FieldError::new("paper_kg", "must be at least 0"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("kitchen_kg: must be at most 10"), "{msg}");
        assert!(msg.contains("paper_kg: must be at least 0"), "{msg}");
    }

    #[test]
    fn insufficient_points_message_matches_api_text() {
        let err = WasteError::InsufficientPoints {
            available: 5,
            required: 50,
        };
        assert_eq!(err.to_string(), "Insufficient eco points");
    }
}
