//! An in-process document tree.
//!
//! Nodes live in a slot map and are addressed by [`NodeId`]. Cloning a [`MemoryDocument`] clones
//! the handle, not the tree. Tag and attribute names are lowercased the way an html document does
//! it, and tree mutations follow the dom rules the renderer relies on (appending an attached node
//! moves it, a node can not be appended into its own subtree). A [`NodeId`] only resolves in the
//! document that created it.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use slotmap::SlotMap;

use super::Document;

slotmap::new_key_type! {
    /// Slot of a node in the arena of its document
    struct NodeKey;
}

/// Source of document identities
static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(0);

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// Identity of the owning document
    document: u64,
    /// Slot in the owning document
    key: NodeKey,
}

/// Elements that never have content or a closing tag when serialized.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An operation the document refused, named after the matching dom exception.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A tag or attribute name contains characters a name can not contain.
    #[error("InvalidCharacterError: `{0}` is not a valid name")]
    InvalidCharacter(String),
    /// The insertion would produce an invalid tree.
    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(&'static str),
    /// The node is not part of this document.
    #[error("NotFoundError: node does not belong to this document")]
    NotFound,
    /// An element operation was used on a text or comment node.
    #[error("InvalidNodeTypeError: node is not an element")]
    NotAnElement,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    /// An element and its attributes in the order they were first set.
    Element {
        /// Lowercased tag name
        tag: String,
        /// Lowercased attribute names mapped to their values
        attributes: IndexMap<String, String>,
    },
    /// Character data
    Text(String),
    /// A comment, only produced as a fallback node
    Comment(String),
}

/// A node and its links.
#[derive(Debug, Clone)]
struct NodeData {
    /// The node payload
    kind: NodeKind,
    /// The node this one is attached to
    parent: Option<NodeKey>,
    /// Children in document order
    children: Vec<NodeKey>,
}

impl NodeData {
    /// A detached node without children
    fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A document tree kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    /// Stamped into every [`NodeId`] this document hands out
    identity: u64,
    /// The shared node arena
    nodes: Rc<RefCell<SlotMap<NodeKey, NodeData>>>,
    /// The `<body>` root
    body: NodeKey,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create an empty document with a `<body>` root.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::detached(NodeKind::Element {
            tag: String::from("body"),
            attributes: IndexMap::new(),
        }));

        Self {
            identity: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            nodes: Rc::new(RefCell::new(nodes)),
            body,
        }
    }

    /// The root `<body>` element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.id_of(self.body)
    }

    /// Does `node` belong to this document
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.key_of(node)
            .is_some_and(|key| self.nodes.borrow().contains_key(key))
    }

    /// The public handle of a slot
    fn id_of(&self, key: NodeKey) -> NodeId {
        NodeId {
            document: self.identity,
            key,
        }
    }

    /// The slot of a handle, `None` for handles of other documents
    fn key_of(&self, node: NodeId) -> Option<NodeKey> {
        (node.document == self.identity).then_some(node.key)
    }

    /// Insert a detached node
    fn insert(&self, kind: NodeKind) -> NodeId {
        let key = self.nodes.borrow_mut().insert(NodeData::detached(kind));
        self.id_of(key)
    }

    /// Lowercased tag name of an element, `None` for other nodes.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match &self.nodes.borrow().get(self.key_of(node)?)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) | NodeKind::Comment(_) => None,
        }
    }

    /// Value of an attribute on an element.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.nodes.borrow().get(self.key_of(node)?)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.get(&name.to_ascii_lowercase()).cloned()
            }
            NodeKind::Text(_) | NodeKind::Comment(_) => None,
        }
    }

    /// All attributes of an element in the order they were first set.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        let nodes = self.nodes.borrow();
        match self.key_of(node).and_then(|key| nodes.get(key)).map(|data| &data.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Children of a node in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        self.key_of(node)
            .and_then(|key| nodes.get(key))
            .map(|data| data.children.iter().map(|child| self.id_of(*child)).collect())
            .unwrap_or_default()
    }

    /// The node this node is attached to.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.nodes.borrow().get(self.key_of(node)?)?.parent?;
        Some(self.id_of(parent))
    }

    /// Concatenated text of all text nodes in the subtree.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        /// Depth first text collection
        fn collect(nodes: &SlotMap<NodeKey, NodeData>, node: NodeKey, out: &mut String) {
            let Some(data) = nodes.get(node) else {
                return;
            };
            match &data.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Comment(_) => {}
                NodeKind::Element { .. } => {
                    for child in &data.children {
                        collect(nodes, *child, out);
                    }
                }
            }
        }

        let mut out = String::new();
        if let Some(key) = self.key_of(node) {
            collect(&self.nodes.borrow(), key, &mut out);
        }
        out
    }

    /// Serialize a node and its subtree as html.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(key) = self.key_of(node) {
            write_html(&self.nodes.borrow(), key, &mut out);
        }
        out
    }

    /// Serialize the children of `<body>`.
    #[must_use]
    pub fn body_html(&self) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        if let Some(body) = nodes.get(self.body) {
            for child in &body.children {
                write_html(&nodes, *child, &mut out);
            }
        }
        out
    }

    /// Is `ancestor` the same node as `node` or one of its ancestors
    fn is_inclusive_ancestor(
        nodes: &SlotMap<NodeKey, NodeData>,
        ancestor: NodeKey,
        node: NodeKey,
    ) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = nodes.get(key).and_then(|data| data.parent);
        }
        false
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if !is_valid_tag_name(tag) {
            return Err(DomError::InvalidCharacter(tag.to_owned()));
        }

        let node = self.insert(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
        });
        log::trace!("Created <{tag}> as {node:?}");
        Ok(node)
    }

    fn create_text_node(&self, data: &str) -> NodeId {
        self.insert(NodeKind::Text(data.to_owned()))
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidCharacter(name.to_owned()));
        }

        let key = self.key_of(*element).ok_or(DomError::NotFound)?;
        let mut nodes = self.nodes.borrow_mut();
        let data = nodes.get_mut(key).ok_or(DomError::NotFound)?;
        match &mut data.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_ascii_lowercase(), value.to_owned());
                Ok(())
            }
            NodeKind::Text(_) | NodeKind::Comment(_) => Err(DomError::NotAnElement),
        }
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let parent = self.key_of(*parent).ok_or(DomError::NotFound)?;
        let child = self.key_of(*child).ok_or(DomError::NotFound)?;
        let mut nodes = self.nodes.borrow_mut();

        if !nodes.contains_key(child) {
            return Err(DomError::NotFound);
        }
        match nodes.get(parent).map(|data| &data.kind) {
            None => return Err(DomError::NotFound),
            Some(NodeKind::Element { .. }) => {}
            Some(NodeKind::Text(_) | NodeKind::Comment(_)) => {
                return Err(DomError::HierarchyRequest(
                    "only elements can have children",
                ));
            }
        }
        if Self::is_inclusive_ancestor(&nodes, child, parent) {
            return Err(DomError::HierarchyRequest(
                "the new child is an ancestor of the parent",
            ));
        }

        let old_parent = nodes.get(child).and_then(|data| data.parent);
        if let Some(old_parent) = old_parent.and_then(|key| nodes.get_mut(key)) {
            old_parent.children.retain(|key| *key != child);
        }
        if let Some(data) = nodes.get_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = nodes.get_mut(parent) {
            data.children.push(child);
        }
        Ok(())
    }

    fn fallback_node(&self) -> NodeId {
        self.insert(NodeKind::Comment(String::from("cascade fallback")))
    }
}

/// A tag name has to start with an ascii letter and can not contain whitespace, `/`, `>` or NUL.
fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| !c.is_ascii_whitespace() && !matches!(c, '\0' | '/' | '>'))
}

/// An attribute name is non empty and free of whitespace, quotes, `/`, `<`, `>`, `=` and NUL.
fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_ascii_whitespace() && !matches!(c, '\0' | '"' | '\'' | '/' | '<' | '>' | '=')
        })
}

/// Serialize one node into `out`.
fn write_html(nodes: &SlotMap<NodeKey, NodeData>, node: NodeKey, out: &mut String) {
    let Some(data) = nodes.get(node) else {
        return;
    };

    match &data.kind {
        NodeKind::Text(text) => escape_into(text, false, out),
        NodeKind::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeKind::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }

            for child in &data.children {
                write_html(nodes, *child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

/// Escape `&`, `<`, `>` in text and `&`, `"` in attribute values.
fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
