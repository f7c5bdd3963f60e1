//! The recursive element builder.
//!
//! An [`ElementNode`] owns a single host element together with the classes, styles, custom
//! attributes and children that should end up on it. Nothing is written to the element until
//! [`ElementNode::render_to`] is called, at which point the attributes are materialized, the
//! children are rendered depth first into the element, and the element is appended to the
//! target.
//!
//! # Example
//! ```
//! # use cascade::prelude::*;
//! let document = MemoryDocument::new();
//!
//! let mut title = ElementNode::tag_in(document.clone(), "h1");
//! title.add_css_class("title").add_sub_component("Hello");
//!
//! let mut card = ElementNode::new_in(document.clone());
//! card.set_style("padding", "4px")
//!     .add_sub_component(title)
//!     .add_sub_component("world");
//!
//! card.render_to(Some(&document.body()));
//! assert_eq!(
//!     document.body_html(),
//!     r#"<div style="padding:4px"><h1 class="title">Hello</h1>world</div>"#
//! );
//! ```

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};

use crate::attributes::{AttributeStage, ToAttribute};
use crate::error_handling::{log_or_panic, log_or_panic_result};
use crate::host::{Document, MemoryDocument, NodeId};

/// The tag used when none is given.
pub const DEFAULT_ELEMENT_TYPE: &str = "div";

/// Where a node is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// Still being built, the element is not attached anywhere.
    #[default]
    Unattached,
    /// `render_to` has attached the element to a parent.
    Attached,
}

/// One child of an [`ElementNode`].
pub enum SubComponent<D: Document> {
    /// A nested node, rendered recursively into the parent element.
    Nested(ElementNode<D>),
    /// Literal text, rendered as a text node.
    Text(Cow<'static, str>),
    /// A node built outside this library, appended as-is.
    Raw(D::Node),
}

impl<D: Document> std::fmt::Debug for SubComponent<D>
where
    D::Node: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nested(node) => f.debug_tuple("Nested").field(node).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Raw(node) => f.debug_tuple("Raw").field(node).finish(),
        }
    }
}

/// Anything that can be added as a child of an [`ElementNode`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` can not be used as a child of `ElementNode<{D}>`.",
    note = "Children are nested nodes, text, numbers, or the host's own node type"
)]
pub trait IntoSubComponent<D: Document> {
    /// Wrap the value as a child.
    fn into_sub_component(self) -> SubComponent<D>;
}

impl<D: Document> IntoSubComponent<D> for SubComponent<D> {
    #[inline]
    fn into_sub_component(self) -> SubComponent<D> {
        self
    }
}

impl<D: Document> IntoSubComponent<D> for ElementNode<D> {
    #[inline]
    fn into_sub_component(self) -> SubComponent<D> {
        SubComponent::Nested(self)
    }
}

impl<D: Document, T: ToAttribute> IntoSubComponent<D> for T {
    #[inline]
    fn into_sub_component(self) -> SubComponent<D> {
        SubComponent::Text(self.to_attribute())
    }
}

impl IntoSubComponent<MemoryDocument> for NodeId {
    #[inline]
    fn into_sub_component(self) -> SubComponent<MemoryDocument> {
        SubComponent::Raw(self)
    }
}

#[cfg(feature = "web")]
impl IntoSubComponent<crate::host::WebDocument> for web_sys::Node {
    #[inline]
    fn into_sub_component(self) -> SubComponent<crate::host::WebDocument> {
        SubComponent::Raw(self)
    }
}

/// A host element and everything that should be rendered onto and into it.
#[must_use = "Element nodes do nothing unless rendered"]
pub struct ElementNode<D: Document> {
    /// The host the element lives in
    document: D,
    /// Identifier, staged during render but not written to the element
    id: Option<Cow<'static, str>>,
    /// Tag of `element`
    element_type: Cow<'static, str>,
    /// Class names in insertion order
    css_classes: IndexSet<Cow<'static, str>>,
    /// Style properties in insertion order
    styles: IndexMap<Cow<'static, str>, Cow<'static, str>>,
    /// Attributes other than `class` and `style`
    custom_attributes: IndexMap<Cow<'static, str>, Cow<'static, str>>,
    /// Children in render order
    sub_components: Vec<SubComponent<D>>,
    /// The staged host element
    element: D::Node,
    /// Lifecycle state
    state: RenderState,
}

impl<D: Document> std::fmt::Debug for ElementNode<D>
where
    D::Node: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementNode")
            .field("id", &self.id)
            .field("element_type", &self.element_type)
            .field("css_classes", &self.css_classes)
            .field("styles", &self.styles)
            .field("custom_attributes", &self.custom_attributes)
            .field("sub_components", &self.sub_components)
            .field("element", &self.element)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Create an element, falling back to the host's fallback node if it refuses the tag.
fn create_element<D: Document>(document: &D, tag: &str) -> D::Node {
    match document.create_element(tag) {
        Ok(node) => node,
        Err(err) => {
            log_or_panic!("Failed to create <{tag}>: {err:?}");
            document.fallback_node()
        }
    }
}

impl<D: Document> ElementNode<D> {
    /// Create a `<div>` node in the given document.
    pub fn new_in(document: D) -> Self {
        Self::tag_in(document, DEFAULT_ELEMENT_TYPE)
    }

    /// Create a node with a specific tag in the given document.
    pub fn tag_in(document: D, element_type: impl Into<Cow<'static, str>>) -> Self {
        let element_type = element_type.into();
        let element = create_element(&document, &element_type);

        Self {
            document,
            id: None,
            element_type,
            css_classes: IndexSet::new(),
            styles: IndexMap::new(),
            custom_attributes: IndexMap::new(),
            sub_components: Vec::new(),
            element,
            state: RenderState::Unattached,
        }
    }

    /// Set the identifier while building.
    pub fn with_id(mut self, id: impl Into<Cow<'static, str>>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the identifier.
    pub fn set_id(&mut self, id: impl Into<Cow<'static, str>>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    /// Remove the identifier.
    pub fn clear_id(&mut self) -> &mut Self {
        self.id = None;
        self
    }

    /// The identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The tag of the element.
    #[must_use]
    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    /// The staged host element.
    ///
    /// Nothing is rendered onto it before `render_to`, but it can already be used for host side
    /// things like event listeners. Changing the element type replaces it.
    #[must_use]
    pub fn element(&self) -> &D::Node {
        &self.element
    }

    /// The host document of this node.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Class names in the order they were added.
    pub fn css_classes(&self) -> impl Iterator<Item = &str> {
        self.css_classes.iter().map(AsRef::as_ref)
    }

    /// Style properties in the order they were first set.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    /// Custom attributes in the order they were first set.
    pub fn custom_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom_attributes
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    /// The children in render order.
    #[must_use]
    pub fn sub_components(&self) -> &[SubComponent<D>] {
        &self.sub_components
    }

    /// Where the node is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// The attributes `render_to` will stage, in order.
    ///
    /// The last entry is the `id` if one is set, which is staged after the others have been
    /// written and never reaches the element.
    #[must_use]
    pub fn staged_attributes(&self) -> AttributeStage {
        let mut stage =
            AttributeStage::collect(&self.custom_attributes, &self.styles, &self.css_classes);
        if let Some(id) = &self.id {
            stage.insert(Cow::Borrowed("id"), id.clone());
        }
        stage
    }

    /// Has `render_to` attached this node.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state == RenderState::Attached
    }

    /// Swap the element for a fresh one with a different tag.
    ///
    /// Anything done directly to the old element is lost. Classes, styles and custom attributes
    /// live on the node and are applied to the new element at render time. The new element is
    /// unattached, so the next `render_to` appends it.
    pub fn set_element_type(&mut self, element_type: impl Into<Cow<'static, str>>) -> &mut Self {
        let element_type = element_type.into();
        log::debug!(
            "Replacing <{}> with <{element_type}>",
            self.element_type
        );

        self.element = create_element(&self.document, &element_type);
        self.element_type = element_type;
        self.state = RenderState::Unattached;
        self
    }

    /// Add a class, does nothing if it is already present.
    pub fn add_css_class(&mut self, class: impl Into<Cow<'static, str>>) -> &mut Self {
        self.css_classes.insert(class.into());
        self
    }

    /// Add several classes in order.
    pub fn add_css_classes<I>(&mut self, classes: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        for class in classes {
            self.add_css_class(class);
        }
        self
    }

    /// Set a style property, replacing any earlier value for it.
    pub fn set_style(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl ToAttribute,
    ) -> &mut Self {
        self.styles.insert(name.into(), value.to_attribute());
        self
    }

    /// Set several style properties.
    pub fn set_styles<I, K, V>(&mut self, styles: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: ToAttribute,
    {
        for (name, value) in styles {
            self.set_style(name, value);
        }
        self
    }

    /// Set an attribute other than `class` or `style`, replacing any earlier value for it.
    pub fn set_custom_attribute(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl ToAttribute,
    ) -> &mut Self {
        self.custom_attributes
            .insert(name.into(), value.to_attribute());
        self
    }

    /// Set several custom attributes.
    pub fn set_custom_attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: ToAttribute,
    {
        for (name, value) in attributes {
            self.set_custom_attribute(name, value);
        }
        self
    }

    /// Append a child. Nested nodes, text, numbers and raw host nodes are accepted.
    pub fn add_sub_component(&mut self, child: impl IntoSubComponent<D>) -> &mut Self {
        self.sub_components.push(child.into_sub_component());
        self
    }

    /// Render the node and its children and append it to `parent`.
    ///
    /// Does nothing when `parent` is `None`. The attributes are written to the element in this
    /// order: custom attributes, `style`, `class`. The `id` is staged after the attributes have
    /// been written and does not reach the element.
    ///
    /// Rendering an attached node again rewrites its attributes and appends its text and raw
    /// children a second time. The element stays where it is, `parent` is ignored.
    pub fn render_to(&mut self, parent: Option<&D::Node>) {
        let Some(parent) = parent else {
            log::trace!("No render target for <{}>, skipping", self.element_type);
            return;
        };

        if self.is_attached() {
            log::warn!(
                "<{}> is already attached, rendering it again in place",
                self.element_type
            );
        }
        log::debug!(
            "Rendering <{}> with {} children",
            self.element_type,
            self.sub_components.len()
        );

        let mut stage =
            AttributeStage::collect(&self.custom_attributes, &self.styles, &self.css_classes);
        stage.flush(&self.document, &self.element);
        if let Some(id) = &self.id {
            stage.insert(Cow::Borrowed("id"), id.clone());
        }

        for sub_component in &mut self.sub_components {
            match sub_component {
                SubComponent::Nested(node) => node.render_to(Some(&self.element)),
                SubComponent::Text(text) => {
                    log::trace!("Appending text {text:?}");
                    let text = self.document.create_text_node(text);
                    log_or_panic_result!(
                        self.document.append_child(&self.element, &text),
                        "Failed to append text to <{}>",
                        self.element_type
                    );
                }
                SubComponent::Raw(node) => {
                    log_or_panic_result!(
                        self.document.append_child(&self.element, node),
                        "Failed to append node to <{}>",
                        self.element_type
                    );
                }
            }
        }

        if self.is_attached() {
            return;
        }
        log_or_panic_result!(
            self.document.append_child(parent, &self.element),
            "Failed to attach <{}>",
            self.element_type
        );
        self.state = RenderState::Attached;
    }
}

#[cfg(feature = "web")]
impl ElementNode<crate::host::WebDocument> {
    /// Create a `<div>` node in the browser document.
    pub fn new() -> Self {
        Self::new_in(crate::host::WebDocument::default())
    }

    /// Create a node with a specific tag in the browser document.
    pub fn tag(element_type: impl Into<Cow<'static, str>>) -> Self {
        Self::tag_in(crate::host::WebDocument::default(), element_type)
    }
}

#[cfg(feature = "web")]
impl Default for ElementNode<crate::host::WebDocument> {
    fn default() -> Self {
        Self::new()
    }
}
