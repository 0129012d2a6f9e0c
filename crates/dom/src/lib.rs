//! Document Tree Library
//!
//! An in-memory, single-threaded document tree with the platform
//! primitives a convenience layer needs: markup parsing, structural
//! selector matching, class lists, serialization and bubbling events.
//!
//! ## Core Design
//!
//! ```text
//! markup ─→ html5ever RcDom ─→ DomArena (owned) ←─ Document (Rc handle)
//!                                   ↓                   ↓
//!                              NodeId (u32)     listeners + config
//! ```
//!
//! Data structures first: nodes are plain indices into one arena, so
//! handles elsewhere are just `(Document, NodeId)` pairs.

pub mod arena;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod parser;
pub mod selector;
pub mod serializer;
pub mod types;

pub use arena::DomArena;
pub use config::{DocumentConfig, SearchBoundary};
pub use document::Document;
pub use error::{DomError, Result};
pub use events::{Event, EventListener, ListenerId};
pub use parser::ParseOptions;
pub use selector::SelectorList;
pub use serializer::{DomSerializer, SerializerConfig};
pub use types::*;
