//! Rendering whole trees into the in-memory document.
#![cfg(not(target_arch = "wasm32"))]

use cascade::prelude::*;
use cascade::{DomError, RenderState};

fn card(
    document: &MemoryDocument,
    title: &'static str,
    body: &'static str,
) -> ElementNode<MemoryDocument> {
    let mut heading = ElementNode::tag_in(document.clone(), "h2");
    heading.add_css_class("card__title").add_sub_component(title);

    let mut card = ElementNode::tag_in(document.clone(), "article");
    card.add_css_classes(["card", "card--shadow"])
        .set_custom_attribute("data-kind", "card")
        .add_sub_component(heading)
        .add_sub_component(body);
    card
}

#[test]
fn renders_nested_tree_depth_first() {
    let document = MemoryDocument::new();

    let mut list = ElementNode::tag_in(document.clone(), "section");
    list.set_style("display", "grid")
        .set_style("gap", "1rem")
        .add_sub_component(card(&document, "One", "first"))
        .add_sub_component(card(&document, "Two", "second"));

    list.render_to(Some(&document.body()));

    assert_eq!(
        document.body_html(),
        concat!(
            r#"<section style="display:grid;gap:1rem">"#,
            r#"<article data-kind="card" class="card card--shadow">"#,
            r#"<h2 class="card__title">One</h2>first</article>"#,
            r#"<article data-kind="card" class="card card--shadow">"#,
            r#"<h2 class="card__title">Two</h2>second</article>"#,
            "</section>"
        )
    );
}

#[test]
fn children_are_attached_after_render() {
    let document = MemoryDocument::new();
    let mut outer = ElementNode::new_in(document.clone());
    outer.add_sub_component(card(&document, "Title", "text"));

    outer.render_to(Some(&document.body()));

    assert_eq!(outer.state(), RenderState::Attached);
    let SubComponent::Nested(inner) = &outer.sub_components()[0] else {
        panic!("expected a nested node");
    };
    assert!(inner.is_attached());
    assert_eq!(document.parent(*inner.element()), Some(*outer.element()));
}

#[test]
fn text_is_escaped_not_parsed() {
    let document = MemoryDocument::new();
    let mut node = ElementNode::tag_in(document.clone(), "p");
    node.add_sub_component("<script>alert(1)</script>");

    node.render_to(Some(&document.body()));

    assert_eq!(document.children(*node.element()).len(), 1);
    assert_eq!(
        document.body_html(),
        "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
    );
}

#[test]
fn raw_node_keeps_its_own_structure() {
    let document = MemoryDocument::new();
    let raw = document.create_element("table").expect("valid tag");
    let row = document.create_element("tr").expect("valid tag");
    document.append_child(&raw, &row).expect("append");

    let mut node = ElementNode::new_in(document.clone());
    node.add_sub_component("before")
        .add_sub_component(SubComponent::Raw(raw))
        .add_sub_component("after");
    node.render_to(Some(&document.body()));

    assert_eq!(
        document.body_html(),
        "<div>before<table><tr></tr></table>after</div>"
    );
}

#[test]
fn render_into_detached_parent() {
    let document = MemoryDocument::new();
    let fragment = document.create_element("template").expect("valid tag");

    let mut node = ElementNode::tag_in(document.clone(), "span");
    node.add_sub_component(1.5_f64);
    node.render_to(Some(&fragment));

    assert_eq!(document.to_html(fragment), "<template><span>1.5</span></template>");
    assert_eq!(document.body_html(), "");
}

#[test]
fn host_errors_are_typed() {
    let document = MemoryDocument::new();
    let text = document.create_text_node("leaf");
    let element = document.create_element("div").expect("valid tag");

    let err = document
        .append_child(&text, &element)
        .expect_err("text can not have children");
    assert!(matches!(err, DomError::HierarchyRequest(_)));
    assert_eq!(
        err.to_string(),
        "HierarchyRequestError: only elements can have children"
    );
}
