//! Tests for `configure`, the builder and how settings shape the rendered subtree.

use std::sync::Arc;

use slimbar::{Document, MemoryDocument, Options, Parent, PositionUsing, SlimBar, TransformSupport};

mod common;
use common::helpers::*;

#[tokio::test]
async fn test_configure_minimum() {
    let document = create_document();
    let bar = create_bar(&document);

    bar.configure(Options::new().minimum(0.5));
    bar.set(0.0);
    assert_status(bar.status(), 0.5);
}

#[tokio::test]
async fn test_configure_keeps_unspecified_fields() {
    let document = create_document();
    let bar = create_bar(&document);

    bar.configure(Options::new().speed(50));
    bar.configure(Options::new().easing("linear"));

    let settings = bar.settings();
    assert_eq!(settings.speed, 50);
    assert_eq!(settings.easing, "linear");
    assert_eq!(settings.trickle_speed, 200);
    assert_eq!(settings.parent, Parent::Body);
}

#[tokio::test]
async fn test_configure_does_not_touch_dom() {
    let document = create_document_with(r#"<div id="test"></div>"#);
    let bar = create_bar(&document);

    bar.set(0.4);
    bar.configure(Options::new().parent("#test"));

    // The live subtree stays where it was rendered.
    assert_eq!(count(&document, "body > .slimbar"), 1);
    assert_eq!(count(&document, "#test > .slimbar"), 0);

    bar.remove();
    bar.start();
    assert_eq!(count(&document, "#test > .slimbar"), 1);
}

#[tokio::test]
async fn test_easing_and_speed_in_bar_transition() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().easing("ease-in-out").speed(350));

    bar.set(0.5);
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(
        document.style(bar_node, "transition").as_deref(),
        Some("all 350ms ease-in-out")
    );
}

// === spinner ===

#[tokio::test]
async fn test_spinner_shown_by_default() {
    let document = create_document();
    let bar = create_bar(&document);

    bar.start();
    assert_eq!(count(&document, ".slimbar .spinner"), 1);
    assert_eq!(count(&document, ".slimbar .spinner-icon"), 1);
}

#[tokio::test]
async fn test_spinner_hidden() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().show_spinner(false));

    bar.start();
    assert_eq!(count(&document, ".slimbar .spinner"), 0);
    assert_eq!(count(&document, ".slimbar .bar"), 1);
}

// === positioning ===

#[tokio::test]
async fn test_auto_position_uses_translate3d() {
    let document = create_document();
    let bar = create_bar(&document);

    bar.set(0.5);
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(
        document.style(bar_node, "transform").as_deref(),
        Some("translate3d(-50%,0,0)")
    );
    assert_eq!(document.style(bar_node, "margin-left"), None);
}

#[tokio::test]
async fn test_auto_position_falls_back_to_margin() {
    let document =
        Arc::new(MemoryDocument::new().with_transform_support(TransformSupport::None));
    let bar = SlimBar::new(document.clone());

    bar.set(0.5);
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(document.style(bar_node, "margin-left").as_deref(), Some("-50%"));
    assert_eq!(document.style(bar_node, "transform"), None);
}

#[tokio::test]
async fn test_auto_position_with_2d_transforms() {
    let document =
        Arc::new(MemoryDocument::new().with_transform_support(TransformSupport::Transform));
    let bar = SlimBar::new(document.clone());

    bar.set(0.25);
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(
        document.style(bar_node, "transform").as_deref(),
        Some("translate(-75%,0)")
    );
}

#[tokio::test]
async fn test_explicit_position_using() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().position_using(PositionUsing::Translate));

    bar.set(0.5);
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(
        document.style(bar_node, "transform").as_deref(),
        Some("translate(-50%,0)")
    );

    bar.configure(Options::new().position_using(PositionUsing::Auto));
    bar.set(0.6);
    assert_eq!(
        document.style(bar_node, "transform").as_deref(),
        Some("translate3d(-40%,0,0)")
    );
}

#[tokio::test]
async fn test_first_render_enters_from_the_left() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().position_using(PositionUsing::Margin));

    // A fresh mount rests at -100% before it moves; with the in-memory
    // document only the final declaration is observable.
    bar.start();
    let bar_node = node(&document, ".slimbar .bar");
    assert_eq!(document.style(bar_node, "margin-left").as_deref(), Some("-92%"));
}

// === template ===

#[tokio::test]
async fn test_custom_template() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(
        Options::new()
            .template(r#"<div class="track"><div class="fill" data-part="fill"></div></div>"#)
            .bar_selector(r#"[data-part="fill"]"#),
    );

    bar.set(0.5);
    assert_eq!(count(&document, ".slimbar .track .fill"), 1);
    assert_eq!(count(&document, ".slimbar .spinner"), 0);

    let fill = node(&document, ".slimbar .fill");
    assert_eq!(
        document.style(fill, "transform").as_deref(),
        Some("translate3d(-50%,0,0)")
    );
}

#[tokio::test]
async fn test_invalid_template_falls_back_to_default() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().template("<div><span></div>"));

    bar.start();
    assert_full_subtree(&document, "body");
}

#[tokio::test]
async fn test_template_without_bar_still_mounts() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().template(r#"<div class="custom"></div>"#));

    bar.set(0.3).set(0.6);
    assert_eq!(count(&document, ".slimbar .custom"), 1);
    assert_status(bar.status(), 0.6);
}

// === parent ===

#[tokio::test]
async fn test_missing_parent_falls_back_to_body() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().parent("#nowhere"));

    bar.start();
    assert_eq!(count(&document, "body > .slimbar"), 1);
    assert!(!document.has_class(document.body(), slimbar::render::CUSTOM_PARENT_CLASS));
}

#[tokio::test]
async fn test_invalid_parent_selector_falls_back_to_body() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().parent("div[id="));

    bar.start();
    assert_eq!(count(&document, "body > .slimbar"), 1);
}

#[tokio::test]
async fn test_parent_by_node() {
    let document = create_document_with(r#"<section id="panel"></section>"#);
    let panel = node(&document, "#panel");
    let bar = create_bar(&document);
    bar.configure(Options::new().parent(panel));

    bar.start();
    let container = bar.container().expect("Bar should be mounted");
    assert_eq!(document.parent(container), Some(panel));
    assert_custom_parent(&document, "#panel");
}

#[tokio::test(start_paused = true)]
async fn test_detached_parent_keeps_one_subtree() {
    let document = create_document();
    let detached = document.create_element("div");
    let bar = create_bar(&document);
    bar.configure(Options::new().parent(detached).trickle_speed(10));

    bar.start();
    let container = bar.container().expect("Bar should be mounted");
    let mounted = document.node_count();
    assert_eq!(document.parent(container), Some(detached));

    sleep_ms(1_000).await;
    assert!(bar.status().expect("Bar should still run") > 0.9);
    assert_eq!(bar.container(), Some(container));
    assert_eq!(document.node_count(), mounted);

    bar.remove();
    assert_eq!(document.children(detached), Vec::new());
    assert!(!document.has_class(detached, slimbar::render::CUSTOM_PARENT_CLASS));
}

#[tokio::test]
async fn test_parent_removed_from_page_keeps_subtree() {
    let document = create_document_with(r#"<div id="test"></div>"#);
    let parent = node(&document, "#test");
    let bar = create_bar(&document);
    bar.configure(Options::new().parent("#test"));

    bar.set(0.2);
    let container = bar.container().expect("Bar should be mounted");
    document.remove_node(parent).unwrap();

    bar.set(0.4).set(0.6);
    assert_eq!(bar.container(), Some(container));
    assert_eq!(document.parent(container), Some(parent));
}

#[tokio::test]
async fn test_subtree_moved_elsewhere_is_rebuilt() {
    let document = create_document_with(r#"<div id="test"></div><div id="other"></div>"#);
    let bar = create_bar(&document);
    bar.configure(Options::new().parent("#test"));

    bar.set(0.2);
    let container = bar.container().expect("Bar should be mounted");
    document
        .append_child(node(&document, "#other"), container)
        .unwrap();

    bar.set(0.4);
    let rebuilt = bar.container().expect("Bar should be mounted again");
    assert_ne!(rebuilt, container);
    assert_eq!(count(&document, "#test > .slimbar"), 1);
    assert_eq!(count(&document, "#other > .slimbar"), 0);
}

#[tokio::test]
async fn test_body_selector_is_not_custom() {
    let document = create_document();
    let bar = create_bar(&document);
    bar.configure(Options::new().parent(" body "));

    assert_eq!(bar.settings().parent, Parent::Body);
    bar.start();
    assert!(!document.has_class(document.body(), slimbar::render::CUSTOM_PARENT_CLASS));
}

// === builder ===

#[tokio::test]
async fn test_builder() {
    let document = create_document_with(r#"<nav id="top"></nav>"#);
    let bar = SlimBar::builder(document.clone())
        .parent("#top")
        .minimum(0.2)
        .speed(120)
        .trickle(false)
        .trickle_speed(400)
        .show_spinner(false)
        .build();

    let settings = bar.settings();
    assert_eq!(settings.speed, 120);
    assert_eq!(settings.trickle_speed, 400);
    assert!(!settings.trickle);

    bar.start();
    assert_status(bar.status(), 0.2);
    assert_eq!(count(&document, "#top > .slimbar"), 1);
    assert_eq!(count(&document, ".slimbar .spinner"), 0);
}

#[tokio::test]
async fn test_builder_clamps_minimum() {
    let document = create_document();
    let bar = SlimBar::builder(document.clone()).minimum(3.0).build();

    assert_status(Some(bar.settings().minimum), 0.99);
}
