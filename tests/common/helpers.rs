use std::sync::Arc;
use std::time::Duration;

use slimbar::render::{BUSY_CLASS, CUSTOM_PARENT_CLASS};
use slimbar::{Document, MemoryDocument, NodeId, Options, SlimBar};
use tracing_subscriber::EnvFilter;

// Common test markup
pub const TWO_PARENTS: &str = r#"<div id="parent1"></div><div id="parent2"></div>"#;
pub const NESTED_PARENTS: &str = r#"<div id="outer"><div id="nested"></div></div>"#;

/// Installs a tracing subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates an empty document
pub fn create_document() -> Arc<MemoryDocument> {
    init_tracing();
    Arc::new(MemoryDocument::new())
}

/// Creates a document whose body holds `markup`
pub fn create_document_with(markup: &str) -> Arc<MemoryDocument> {
    init_tracing();
    Arc::new(MemoryDocument::with_body(markup).expect("Failed to parse test markup"))
}

/// Creates a bar with default settings on `document`
pub fn create_bar(document: &Arc<MemoryDocument>) -> SlimBar {
    SlimBar::new(document.clone())
}

/// Creates a bar mounted under `parent` with fast finishing delays
/// (fade after 10ms, removal 20ms later)
pub fn create_fast_bar(document: &Arc<MemoryDocument>, parent: &str) -> SlimBar {
    let bar = SlimBar::new(document.clone());
    bar.configure(Options::new().parent(parent).speed(10).trickle_speed(20));
    bar
}

/// Looks up an element that must exist
pub fn node(document: &MemoryDocument, selector: &str) -> NodeId {
    document
        .query(selector)
        .expect("Invalid selector")
        .unwrap_or_else(|| panic!("No element matches {selector}"))
}

/// Counts attached elements matching `selector`
pub fn count(document: &MemoryDocument, selector: &str) -> usize {
    document.query_all(selector).expect("Invalid selector").len()
}

/// Advances the (paused) test clock
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// === Assertion Helpers ===

/// Asserts one complete bar subtree (container, bar, peg, spinner) under `scope`
pub fn assert_full_subtree(document: &MemoryDocument, scope: &str) {
    assert_eq!(count(document, &format!("{scope} > .slimbar")), 1);
    assert_eq!(count(document, &format!("{scope} > .slimbar .bar")), 1);
    assert_eq!(count(document, &format!("{scope} > .slimbar .peg")), 1);
    assert_eq!(count(document, &format!("{scope} > .slimbar .spinner")), 1);
}

/// Asserts that `parent` carries the custom parent marker
pub fn assert_custom_parent(document: &MemoryDocument, parent: &str) {
    assert!(
        document.has_class(node(document, parent), CUSTOM_PARENT_CLASS),
        "{parent} should carry the custom parent marker"
    );
}

/// Asserts that `parent` has no marker and no bar left
pub fn assert_cleared(document: &MemoryDocument, parent: &str) {
    let parent_node = node(document, parent);
    assert!(
        !document.has_class(parent_node, CUSTOM_PARENT_CLASS),
        "{parent} should not carry the custom parent marker"
    );
    assert_eq!(count(document, &format!("{parent} .slimbar")), 0);
}

/// Whether the document element is flagged busy
pub fn is_busy(document: &MemoryDocument) -> bool {
    document.has_class(document.document_element(), BUSY_CLASS)
}

/// Asserts two statuses are equal up to float noise
pub fn assert_status(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("Bar should be started");
    assert!(
        (actual - expected).abs() < 1e-9,
        "status {actual} should equal {expected}"
    );
}
