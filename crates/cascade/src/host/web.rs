//! The browser document, through `web-sys`.

use wasm_bindgen::{JsCast, JsValue, intern};

use super::Document;

/// Handle to the browser document of the current thread.
#[derive(Debug, Clone)]
pub struct WebDocument {
    /// The js document
    document: web_sys::Document,
}

impl Default for WebDocument {
    fn default() -> Self {
        Self {
            document: crate::get_document(),
        }
    }
}

impl WebDocument {
    /// Wrap a specific document, for example one from an iframe.
    #[must_use]
    pub fn from_document(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The wrapped js document
    #[must_use]
    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for WebDocument {
    type Node = web_sys::Node;
    type Error = JsValue;

    fn create_element(&self, tag: &str) -> Result<web_sys::Node, JsValue> {
        self.document.create_element(tag).map(Into::into)
    }

    fn create_text_node(&self, data: &str) -> web_sys::Node {
        self.document.create_text_node(data).into()
    }

    fn set_attribute(
        &self,
        element: &web_sys::Node,
        name: &str,
        value: &str,
    ) -> Result<(), JsValue> {
        let Some(element) = element.dyn_ref::<web_sys::Element>() else {
            return Err(JsValue::from_str("Attribute target is not an element"));
        };
        element.set_attribute(name, value)
    }

    fn append_child(&self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
        parent.append_child(child).map(|_| ())
    }

    fn fallback_node(&self) -> web_sys::Node {
        self.document
            .create_comment(intern("cascade fallback"))
            .into()
    }
}
