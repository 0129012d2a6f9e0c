//! Error types for tree operations
//!
//! Simple, flat error hierarchy. Absent-target navigation is never an
//! error; it is modeled with `Option` / empty collections by callers.

use thiserror::Error;

use crate::types::NodeId;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid class token: {0:?}")]
    InvalidToken(String),

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node belongs to a different document")]
    WrongDocument,

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl DomError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
