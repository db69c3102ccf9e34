//! Error handling for the slimbar library.
//!
//! The public progress operations never fail: out-of-range values are clamped
//! and environmental problems fall back to defaults. The errors defined here
//! travel between the DOM capability, the render engine and the timers, and
//! are logged at the point where the fallback is chosen.

use crate::dom::NodeId;
use thiserror::Error;

/// Errors that can happen inside slimbar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A selector string could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A markup fragment could not be parsed.
    ///
    /// Returned by [`Document::set_inner_html`](crate::dom::Document::set_inner_html)
    /// when the template is malformed (unbalanced or unterminated tags).
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),

    /// A node handle does not belong to the document.
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The document element and the body cannot be released.
    #[error("Node cannot be released: {0:?}")]
    ProtectedNode(NodeId),

    /// A timer was requested outside of a tokio runtime.
    #[error("No tokio runtime available to schedule timers")]
    NoRuntime,
}

/// Result type alias for fallible slimbar operations.
pub type Result<T> = std::result::Result<T, Error>;
