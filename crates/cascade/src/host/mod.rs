//! The host document an `ElementNode` renders through.
//!
//! A host provides the handful of primitives the renderer needs: creating elements and text
//! nodes, setting attributes and appending children. [`MemoryDocument`] keeps the tree in process
//! and is what the native tests inspect, [`WebDocument`] forwards to the browser through
//! `web-sys`.

use std::fmt::Debug;

pub mod memory;
#[cfg(feature = "web")]
pub mod web;

pub use memory::{DomError, MemoryDocument, NodeId};
#[cfg(feature = "web")]
pub use web::WebDocument;

/// Element creation and tree mutation primitives of a host document.
///
/// Handles are expected to be cheap to clone and to refer to the same underlying document.
pub trait Document: Clone + 'static {
    /// A node in the host tree (element, text, or anything else the host knows about).
    type Node: Clone;
    /// The error the host reports for a rejected operation.
    type Error: Debug;

    /// Create a detached element with the given tag name.
    ///
    /// # Errors
    /// If the host rejects the tag name.
    fn create_element(&self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Create a detached text node.
    fn create_text_node(&self, data: &str) -> Self::Node;

    /// Set (or overwrite) an attribute on an element.
    ///
    /// # Errors
    /// If `element` is not an element or the attribute name is invalid.
    fn set_attribute(&self, element: &Self::Node, name: &str, value: &str)
    -> Result<(), Self::Error>;

    /// Append `child` as the last child of `parent`, moving it if it already has a parent.
    ///
    /// # Errors
    /// If the host refuses the insertion, for example appending a node into its own subtree.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// A node to stand in for an element the host failed to create.
    ///
    /// Operations on it are expected to fail, and those failures are handled like any other.
    fn fallback_node(&self) -> Self::Node;
}
