//! Selector queries, node handles and delegated events over a [`dom::Document`]
//!
//! ```text
//! let doc = Document::parse(markup)?;
//! let list = query::select(&doc, "#list")?;          // Vec<NodeHandle>
//! let item = list[0].append("<li>new</li>")?;         // handle to the new <li>
//! let click = list[0].on("click", delegate("li", |li, _| { ... })?)?;
//! click.remove();
//! ```
//!
//! Handles are plain `(Document, NodeId)` pairs; every operation reads
//! or mutates the shared arena immediately. Builders from [`vdom`] can be
//! passed anywhere [`Content`] is accepted.

pub mod content;
pub mod delegate;
pub mod engine;
pub mod handle;

pub use content::Content;
pub use delegate::{delegate, delegate_with, DelegationMatcher};
pub use engine::{query, select, select_in, wrap, Scope, Selection, Target};
pub use handle::{EventBinding, NodeHandle};

pub use dom::{Document, DomError, Event, NodeId, Result, SearchBoundary};
