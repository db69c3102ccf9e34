//! DOM capability consumed by the render engine.
//!
//! The engine never talks to a concrete DOM. It goes through the [`Document`]
//! trait, which covers exactly what a slim progress bar needs: element
//! creation from a markup template, selector lookups, class and inline style
//! mutation, subtree attach/detach and existence checks.
//!
//! [`MemoryDocument`] is the bundled implementation: a headless, thread-safe
//! element tree with a small markup parser and CSS selector matcher.
//!
//! # Examples
//!
//! ```rust
//! use slimbar::dom::{Document, MemoryDocument};
//!
//! let doc = MemoryDocument::with_body(r#"<div id="app"><main class="content"></main></div>"#)
//!     .expect("valid markup");
//!
//! let app = doc.query("#app").unwrap().expect("app exists");
//! let main = doc.query_within(app, "main.content").unwrap();
//! assert!(main.is_some());
//! ```

pub(crate) mod markup;
pub mod memory;
pub(crate) mod selector;

pub use memory::MemoryDocument;

use crate::error::Result;

/// Opaque handle to an element owned by a [`Document`].
///
/// Handles stay valid after the element is detached; [`Document::contains`]
/// tells whether the element is still part of the live tree. Once the element
/// is released its handle goes stale and is never handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// CSS transform capability of the environment.
///
/// Probed once when a bar is constructed and used to resolve
/// [`PositionUsing::Auto`](crate::bar::PositionUsing::Auto).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformSupport {
    /// No transforms; the bar is positioned with `margin-left`.
    None,
    /// 2D transforms only.
    Transform,
    /// 3D transforms (`perspective` is available).
    #[default]
    Transform3d,
}

/// The DOM operations used by the render engine.
///
/// Implementations must be cheap to call and internally synchronized, since a
/// document can be shared by several bars living on different tasks.
pub trait Document: Send + Sync {
    /// The root element (`<html>`).
    fn document_element(&self) -> NodeId;

    /// The default mount container (`<body>`).
    fn body(&self) -> NodeId;

    /// Creates a detached element.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Replaces the children of `node` with the elements described by `markup`.
    fn set_inner_html(&self, node: NodeId, markup: &str) -> Result<()>;

    /// Returns the first attached element matching `selector`, in document order.
    fn query(&self, selector: &str) -> Result<Option<NodeId>>;

    /// Returns the first descendant of `scope` matching `selector`.
    ///
    /// Works on detached subtrees as well.
    fn query_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>>;

    /// Appends `child` as the last child of `parent`, detaching it first if needed.
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Detaches `node` (and its subtree) from its parent.
    fn remove_node(&self, node: NodeId) -> Result<()>;

    /// Detaches `node` and hands its subtree back to the document.
    ///
    /// Every handle into the subtree is invalid afterwards. Documents that
    /// reclaim detached elements on their own can keep the default, which
    /// only detaches.
    fn release(&self, node: NodeId) -> Result<()> {
        self.remove_node(node)
    }

    /// The parent of `node`, whether or not it is attached to the document.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Adds a class to `node`. Adding an existing class is a no-op.
    fn add_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Removes a class from `node`. Removing a missing class is a no-op.
    fn remove_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Whether `node` carries `class`. Unknown nodes carry nothing.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Sets an inline style property on `node`.
    fn set_style(&self, node: NodeId, property: &str, value: &str) -> Result<()>;

    /// Whether `node` is attached to the document tree.
    fn contains(&self, node: NodeId) -> bool;

    /// Element children of `node`, in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// CSS transform support of this environment.
    fn transform_support(&self) -> TransformSupport {
        TransformSupport::Transform3d
    }
}
