//! Error types for the editor

use crate::document::Violation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid template: {}", format_violations(.0))]
    InvalidTemplate(Vec<Violation>),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Media error: {0}")]
    Media(String),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Editor result alias
pub type EditorResult<T> = Result<T, EditorError>;
