//! Rendering into a real browser document.
#![cfg(all(target_arch = "wasm32", feature = "test_utils"))]

use cascade::prelude::*;
use cascade::test_utils::{get, setup};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

const CARD_ID: &str = "card";

#[wasm_bindgen_test]
fn renders_attributes_and_children() {
    let mount = setup();

    let mut title = ElementNode::tag("h1");
    title.add_sub_component("Hello");

    let mut card = ElementNode::new();
    card.set_custom_attribute("id", CARD_ID)
        .set_style("color", "red")
        .add_css_classes(["a", "b", "a"])
        .add_sub_component(title)
        .add_sub_component(" world");
    card.render_to(Some(&mount));

    let element = get(CARD_ID);
    assert_eq!(element.class_name(), "a b");
    assert_eq!(element.get_attribute("style"), Some("color:red".to_owned()));
    assert_eq!(element.text_content(), Some("Hello world".to_owned()));
    assert_eq!(element.inner_html(), "<h1>Hello</h1> world");
}

#[wasm_bindgen_test]
fn id_is_not_written_to_the_element() {
    let mount = setup();

    let mut node = ElementNode::new().with_id("never-rendered");
    node.render_to(Some(&mount));

    let element: web_sys::Element = mount
        .first_child()
        .expect("node was rendered")
        .dyn_into()
        .expect("rendered an element");
    assert_eq!(element.get_attribute("id"), None);
    assert_eq!(node.id(), Some("never-rendered"));
}

#[wasm_bindgen_test]
fn no_parent_is_noop() {
    let mount = setup();

    let mut node = ElementNode::new();
    node.add_sub_component("text");
    node.render_to(None);

    assert!(!mount.has_child_nodes());
    assert!(!node.is_attached());
}

#[wasm_bindgen_test]
fn raw_nodes_are_appended() {
    let mount = setup();
    let raw: web_sys::Node = WebDocument::default()
        .create_element("em")
        .expect("valid tag");

    let mut node = ElementNode::new();
    node.set_custom_attribute("id", CARD_ID).add_sub_component(raw);
    node.render_to(Some(&mount));

    assert_eq!(get(CARD_ID).inner_html(), "<em></em>");
}
