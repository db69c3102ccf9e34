//! Headless in-memory [`Document`].
//!
//! The tree lives in an arena behind a [`parking_lot::Mutex`]. Detached nodes
//! stay in the arena so their handles remain valid, mirroring how element
//! references behave in a browser, until they are released. Released slots go
//! on a free list and come back with a bumped generation, so stale handles
//! never alias a newer element.

use std::fmt;

use parking_lot::Mutex;

use crate::dom::markup::{parse_fragment, ElementSpec};
use crate::dom::selector::{NodeView, SelectorList};
use crate::dom::{Document, NodeId, TransformSupport};
use crate::error::{Error, Result};

const HTML: NodeId = NodeId::new(0, 0);
const BODY: NodeId = NodeId::new(2, 0);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

/// A thread-safe in-memory element tree implementing [`Document`].
///
/// A fresh document has the shape `<html><head></head><body></body></html>`.
pub struct MemoryDocument {
    tree: Mutex<Tree>,
    transform_support: TransformSupport,
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.node_count())
            .field("transform_support", &self.transform_support)
            .finish()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let html = tree.create("html");
        let head = tree.create("head");
        let body = tree.create("body");
        tree.append(html, head);
        tree.append(html, body);

        Self {
            tree: Mutex::new(tree),
            transform_support: TransformSupport::default(),
        }
    }

    /// Creates a document whose body holds the elements described by `markup`.
    pub fn with_body(markup: &str) -> Result<Self> {
        let document = Self::new();
        document.set_inner_html(BODY, markup)?;
        Ok(document)
    }

    /// Sets the transform capability reported to bars built on this document.
    pub fn with_transform_support(mut self, support: TransformSupport) -> Self {
        self.transform_support = support;
        self
    }

    /// Number of elements held by the document, attached or not.
    pub fn node_count(&self) -> usize {
        let tree = self.tree.lock();
        tree.slots.len() - tree.free.len()
    }

    /// Returns every attached element matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let tree = self.tree.lock();
        Ok(tree
            .descendants(HTML)
            .into_iter()
            .filter(|node| selector.matches(&*tree, *node))
            .collect())
    }

    /// Returns every descendant of `scope` matching `selector`.
    pub fn query_all_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let tree = self.tree.lock();
        tree.node(scope)?;
        Ok(tree
            .descendants(scope)
            .into_iter()
            .filter(|node| selector.matches(&*tree, *node))
            .collect())
    }

    /// Returns the inline style value of `property`, if set.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let tree = self.tree.lock();
        tree.get(node)?
            .style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.clone())
    }

    /// Returns an attribute value. `class` and `style` are serialized from
    /// the class list and inline style.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.lock().attribute(node, name)
    }

    /// Sets an attribute. `class` and `style` replace the class list and
    /// inline style respectively.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.tree.lock().node_mut(node)?.set_attribute(name, value);
        Ok(())
    }

    /// Returns the lowercase tag name of `node`.
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree.lock().get(node).map(|n| n.tag.clone())
    }
}

impl Document for MemoryDocument {
    fn document_element(&self) -> NodeId {
        HTML
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn create_element(&self, tag: &str) -> NodeId {
        self.tree.lock().create(tag)
    }

    /// Replaced children are released along with their subtrees.
    fn set_inner_html(&self, node: NodeId, markup: &str) -> Result<()> {
        let specs = parse_fragment(markup)?;
        let mut tree = self.tree.lock();
        let replaced = std::mem::take(&mut tree.node_mut(node)?.children);
        for child in replaced {
            tree.free_subtree(child);
        }
        for spec in &specs {
            tree.build(node, spec);
        }
        Ok(())
    }

    fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let tree = self.tree.lock();
        Ok(tree
            .descendants(HTML)
            .into_iter()
            .find(|node| selector.matches(&*tree, *node)))
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let tree = self.tree.lock();
        tree.node(scope)?;
        Ok(tree
            .descendants(scope)
            .into_iter()
            .find(|node| selector.matches(&*tree, *node)))
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.node(parent)?;
        tree.node(child)?;
        if parent == child || tree.is_ancestor(child, parent) {
            return Err(Error::UnknownNode(child));
        }
        tree.detach(child);
        tree.append(parent, child);
        Ok(())
    }

    fn remove_node(&self, node: NodeId) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.node(node)?;
        tree.detach(node);
        Ok(())
    }

    fn release(&self, node: NodeId) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.node(node)?;
        if node == HTML || node == BODY || tree.is_ancestor(node, BODY) {
            return Err(Error::ProtectedNode(node));
        }
        tree.free_subtree(node);
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.lock().get(node)?.parent
    }

    fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut tree = self.tree.lock();
        let classes = &mut tree.node_mut(node)?.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut tree = self.tree.lock();
        tree.node_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        NodeView::has_class(&*self.tree.lock(), node, class)
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let mut tree = self.tree.lock();
        let style = &mut tree.node_mut(node)?.style;
        match style.iter_mut().find(|(name, _)| name == property) {
            Some((_, current)) => *current = value.to_string(),
            None => style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        let tree = self.tree.lock();
        tree.get(node).is_some() && (node == HTML || tree.is_ancestor(HTML, node))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .lock()
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn transform_support(&self) -> TransformSupport {
        self.transform_support
    }
}

impl Node {
    fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                self.style = value
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .filter(|(k, _)| !k.is_empty())
                    .collect();
            }
            _ => match self.attributes.iter_mut().find(|(n, _)| *n == name) {
                Some((_, current)) => *current = value.to_string(),
                None => self.attributes.push((name, value.to_string())),
            },
        }
    }
}

impl Tree {
    fn create(&mut self, tag: &str) -> NodeId {
        let node = Node {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(self.slots.len() - 1, 0)
            }
        }
    }

    fn build(&mut self, parent: NodeId, spec: &ElementSpec) {
        let node = self.create(&spec.tag);
        if let Some(entry) = self.get_mut(node) {
            for (name, value) in &spec.attributes {
                entry.set_attribute(name, value);
            }
        }
        self.append(parent, node);
        for child in &spec.children {
            self.build(node, child);
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_mut()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.get_mut(id).ok_or(Error::UnknownNode(id))
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.get_mut(node).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    /// Detaches `root` and returns it and all its descendants to the free list.
    fn free_subtree(&mut self, root: NodeId) {
        self.detach(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                stack.extend(node.children);
            }
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(|n| n.parent);
        }
        false
    }

    /// Strict descendants of `scope` in document (pre-)order.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(scope)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(entry) = self.get(node) {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        out
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let entry = self.get(node)?;
        match name {
            "class" if !entry.classes.is_empty() => Some(entry.classes.join(" ")),
            "class" => None,
            "style" if !entry.style.is_empty() => Some(
                entry
                    .style
                    .iter()
                    .map(|(k, v)| format!("{}: {};", k, v))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            "style" => None,
            _ => entry
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
        }
    }
}

impl NodeView for Tree {
    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|n| n.tag.as_str())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        Tree::attribute(self, node, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_shape() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.tag_name(doc.document_element()).as_deref(), Some("html"));
        assert_eq!(doc.tag_name(doc.body()).as_deref(), Some("body"));
        assert_eq!(doc.parent(doc.body()), Some(doc.document_element()));
        assert!(doc.contains(doc.body()));
    }

    #[test]
    fn test_detached_subtree_is_queryable_within() {
        let doc = MemoryDocument::new();
        let div = doc.create_element("div");
        doc.set_inner_html(div, r#"<div class="bar"><div class="peg"></div></div>"#)
            .unwrap();

        assert!(!doc.contains(div));
        assert!(doc.query(".peg").unwrap().is_none());
        assert!(doc.query_within(div, ".bar .peg").unwrap().is_some());

        doc.append_child(doc.body(), div).unwrap();
        assert!(doc.contains(div));
        assert!(doc.query("body > div > .bar > .peg").unwrap().is_some());
    }

    #[test]
    fn test_append_rejects_cycles() {
        let doc = MemoryDocument::with_body(r#"<div id="a"><div id="b"></div></div>"#).unwrap();
        let a = doc.query("#a").unwrap().unwrap();
        let b = doc.query("#b").unwrap().unwrap();
        assert!(doc.append_child(b, a).is_err());
        assert!(doc.append_child(a, a).is_err());
    }

    #[test]
    fn test_class_and_style_round_through_attributes() {
        let doc = MemoryDocument::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "one  two").unwrap();
        doc.add_class(div, "two").unwrap();
        doc.add_class(div, "three").unwrap();
        doc.remove_class(div, "one").unwrap();
        assert_eq!(doc.attribute(div, "class").as_deref(), Some("two three"));

        doc.set_attribute(div, "style", "opacity: 1; transition: none").unwrap();
        doc.set_style(div, "opacity", "0").unwrap();
        assert_eq!(doc.style(div, "opacity").as_deref(), Some("0"));
        assert_eq!(doc.style(div, "transition").as_deref(), Some("none"));
    }

    #[test]
    fn test_unknown_node_errors() {
        let doc = MemoryDocument::new();
        let ghost = NodeId::new(999, 0);
        assert_eq!(doc.add_class(ghost, "x"), Err(Error::UnknownNode(ghost)));
        assert!(!doc.has_class(ghost, "x"));
        assert!(!doc.contains(ghost));
        assert!(doc.children(ghost).is_empty());
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let doc = MemoryDocument::with_body("<p></p><p></p>").unwrap();
        assert_eq!(doc.query_all("p").unwrap().len(), 2);
        doc.set_inner_html(doc.body(), "<span></span>").unwrap();
        assert!(doc.query_all("p").unwrap().is_empty());
        assert_eq!(doc.children(doc.body()).len(), 1);
    }

    #[test]
    fn test_release_recycles_slots() {
        let doc = MemoryDocument::new();
        let div = doc.create_element("div");
        doc.set_inner_html(div, r#"<div class="bar"><div class="peg"></div></div>"#)
            .unwrap();
        doc.append_child(doc.body(), div).unwrap();
        let peg = doc.query(".peg").unwrap().unwrap();
        assert_eq!(doc.node_count(), 6);

        doc.release(div).unwrap();
        assert_eq!(doc.node_count(), 3);
        assert!(doc.children(doc.body()).is_empty());
        assert_eq!(doc.add_class(peg, "x"), Err(Error::UnknownNode(peg)));

        // A recycled slot never answers to the stale handle.
        let fresh = doc.create_element("span");
        assert_ne!(fresh, div);
        assert_ne!(fresh, peg);
        assert!(!doc.has_class(peg, "x"));
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn test_release_protects_root_and_body() {
        let doc = MemoryDocument::new();
        let html = doc.document_element();
        assert_eq!(doc.release(html), Err(Error::ProtectedNode(html)));
        assert_eq!(doc.release(doc.body()), Err(Error::ProtectedNode(doc.body())));
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn test_set_inner_html_releases_replaced_children() {
        let doc = MemoryDocument::with_body("<ul><li></li><li></li></ul>").unwrap();
        assert_eq!(doc.node_count(), 6);
        for _ in 0..10 {
            doc.set_inner_html(doc.body(), "<p><span></span></p>").unwrap();
        }
        assert_eq!(doc.node_count(), 5);
    }

    #[test]
    fn test_parent_of_detached_subtree() {
        let doc = MemoryDocument::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(outer, inner).unwrap();

        assert_eq!(doc.parent(inner), Some(outer));
        assert_eq!(doc.parent(outer), None);
        assert!(!doc.contains(inner));
    }
}
