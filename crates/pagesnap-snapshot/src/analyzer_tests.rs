use super::*;
use crate::document::{CaptureDocument, CapturedElement, MemoryDocument};

fn load(body: CapturedElement) -> MemoryDocument {
    MemoryDocument::from_capture(CaptureDocument::new(body).with_url("https://example.com/")).unwrap()
}

fn page() -> CapturedElement {
    CapturedElement::new("body")
        .rect(0.0, 0.0, 1280.0, 720.0)
        .child(CapturedElement::new("h1").rect(0.0, 0.0, 400.0, 40.0).text("Welcome"))
        .child(
            CapturedElement::new("div").shadow(
                CapturedElement::new("button")
                    .rect(0.0, 60.0, 120.0, 30.0)
                    .cursor("pointer")
                    .text("Continue"),
            ),
        )
}

#[test]
fn test_default_config() {
    let config = SnapshotConfig::default();
    assert_eq!(config.ref_attribute, "aria-ref");
    assert!(config.include_frames);
    assert_eq!(config.max_frame_depth, 8);

    let parsed: SnapshotConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_analyze_produces_text_and_registry() {
    let mut doc = load(page());
    let mut analyzer = PageAnalyzer::default();

    let snap = analyzer.analyze(&mut doc).unwrap();
    assert_eq!(snap.url, "https://example.com/");
    assert_eq!(
        snap.snapshot,
        "- heading \"Welcome\" [level=1] [ref=e1]\n- button \"Continue\" [ref=e2] [cursor=pointer]"
    );
    assert_eq!(snap.metadata.element_count, 2);
    assert_eq!(snap.metadata.viewport.width, 1280);
    assert_eq!(snap.elements["e2"].tag, "button");
}

#[test]
fn test_repeated_analysis_is_reproducible() {
    let mut doc = load(page());
    let mut analyzer = PageAnalyzer::default();

    let first = analyzer.analyze(&mut doc).unwrap();
    let second = analyzer.analyze(&mut doc).unwrap();
    assert_eq!(first.snapshot, second.snapshot);
    assert_eq!(first.elements, second.elements);
}

#[test]
fn test_resolve_ref_finds_shadow_element() {
    let mut doc = load(page());
    let mut analyzer = PageAnalyzer::default();
    analyzer.analyze(&mut doc).unwrap();

    let node = analyzer.resolve_ref(&doc, "e2").unwrap();
    assert_eq!(doc.tag_name(node).as_deref(), Some("button"));
    assert!(matches!(
        analyzer.resolve_ref(&doc, "e99"),
        Err(SnapshotError::RefNotFound(r)) if r == "e99"
    ));
}

#[test]
fn test_custom_ref_attribute() {
    let mut doc = load(page());
    let mut analyzer = PageAnalyzer::new(SnapshotConfig {
        ref_attribute: "data-ref".to_string(),
        ..SnapshotConfig::default()
    });
    analyzer.analyze(&mut doc).unwrap();

    assert_eq!(doc.attribute(NodeId(1), "data-ref").as_deref(), Some("e1"));
    assert!(doc.attribute(NodeId(1), "aria-ref").is_none());
    assert_eq!(analyzer.ref_selector("e1"), "[data-ref='e1']");
}

#[test]
fn test_empty_body_yields_empty_snapshot() {
    let mut doc = load(CapturedElement::new("body"));
    let snap = PageAnalyzer::default().analyze(&mut doc).unwrap();

    assert!(snap.snapshot.is_empty());
    assert!(snap.elements.is_empty());
    assert_eq!(snap.metadata.element_count, 0);
}

#[test]
fn test_render_text_only() {
    let mut doc = load(page());
    let text = PageAnalyzer::default().render_text(&mut doc).unwrap();
    assert_eq!(text.lines().count(), 2);
}
