//! Document configuration
//!
//! Plain serde structs with `Default`, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parser::ParseOptions;
use crate::serializer::SerializerConfig;

/// Where an upward delegation walk gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBoundary {
    /// The top element of the target's tree may still be matched
    #[default]
    IncludeRoot,
    /// The top element (the document element, or the top node of a
    /// detached tree) is never matched
    ExcludeRoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub parse: ParseOptions,
    pub serialize: SerializerConfig,
    /// Default boundary for delegated listeners
    pub delegation_boundary: SearchBoundary,
}

impl DocumentConfig {
    /// Load from JSON text; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
