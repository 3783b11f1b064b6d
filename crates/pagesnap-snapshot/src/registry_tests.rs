use super::*;
use crate::builder::TreeBuilder;
use crate::context::AnalysisContext;
use crate::document::{CaptureDocument, CapturedElement, MemoryDocument};
use crate::normalizer::TreeNormalizer;
use crate::renderer::SnapshotRenderer;
use crate::snapshot::extract_refs;

fn load(body: CapturedElement) -> MemoryDocument {
    MemoryDocument::from_capture(CaptureDocument::new(body)).unwrap()
}

fn normalized(doc: &mut MemoryDocument) -> SemanticNode {
    let mut ctx = AnalysisContext::new();
    let raw = TreeBuilder::new(&mut *doc, &mut ctx, "aria-ref").build().unwrap();
    TreeNormalizer::new(&*doc).normalize_root(raw)
}

fn form_page() -> CapturedElement {
    CapturedElement::new("body")
        .rect(0.0, 0.0, 1280.0, 720.0)
        .child(
            CapturedElement::new("form")
                .attr("aria-label", "Sign in")
                .rect(0.0, 0.0, 400.0, 300.0)
                .child(
                    CapturedElement::new("input")
                        .attr("aria-label", "Email")
                        .attr("placeholder", "you@example.com")
                        .rect(10.0, 10.0, 200.0, 24.0)
                        .value("ada@example.com"),
                )
                .child(
                    CapturedElement::new("a")
                        .attr("href", "/forgot")
                        .cursor("pointer")
                        .rect(10.0, 50.0, 120.0, 20.0)
                        .text("Forgot password?"),
                )
                .child(
                    CapturedElement::new("ul")
                        .attr("aria-label", "Recent")
                        .rect(10.0, 80.0, 200.0, 100.0)
                        .scroll(400.0, 100.0)
                        .child(CapturedElement::new("li").rect(10.0, 80.0, 200.0, 20.0).text("First")),
                )
                .child(CapturedElement::new("div").rect(10.0, 200.0, 200.0, 20.0).text("Plain note")),
        )
}

#[test]
fn test_records_carry_metadata() {
    let mut doc = load(form_page());
    let tree = normalized(&mut doc);
    let mut registry = ElementRegistry::new();
    registry.register_tree(&doc, &tree);

    let form = registry.get("e1").unwrap();
    assert_eq!(form.role, "form");
    assert_eq!(form.tag, "form");

    let email = registry.get("e2").unwrap();
    assert_eq!(email.role, "textbox");
    assert_eq!(email.name, "Email");
    assert_eq!(email.value.as_deref(), Some("ada@example.com"));
    assert_eq!(email.placeholder.as_deref(), Some("you@example.com"));
    assert_eq!(email.rects.len(), 1);
    assert!(!email.has_pointer_cursor);

    let link = registry.get("e3").unwrap();
    assert_eq!(link.href.as_deref(), Some("/forgot"));
    assert!(link.has_pointer_cursor);
    assert!(link.receives_pointer_events);

    let list = registry.get("e4").unwrap();
    assert!(list.scrollable);
    assert!(!email.scrollable);

    let item = registry.get("e5").unwrap();
    assert_eq!(item.role, "listitem");
    assert_eq!(item.name, "First");
}

#[test]
fn test_registry_matches_rendered_refs() {
    let mut doc = load(form_page());
    let tree = normalized(&mut doc);
    let mut registry = ElementRegistry::new();
    registry.register_tree(&doc, &tree);

    let text = SnapshotRenderer::new(&doc).snapshot_lines(&tree).join("\n");
    let mut rendered = extract_refs(&text);
    rendered.sort();
    let keys: Vec<String> = registry.clone().into_map().into_keys().collect();
    assert_eq!(rendered, keys);
    assert_eq!(registry.len(), 5);
}

#[test]
fn test_transparent_nodes_are_not_registered() {
    let mut doc = load(
        CapturedElement::new("body")
            .rect(0.0, 0.0, 1280.0, 720.0)
            .child(CapturedElement::new("input").rect(0.0, 0.0, 100.0, 20.0))
            .child(CapturedElement::new("button").rect(0.0, 40.0, 100.0, 20.0).text("Send")),
    );
    let tree = normalized(&mut doc);
    let mut registry = ElementRegistry::new();
    registry.register_tree(&doc, &tree);

    // The unnamed textbox got e1 from the builder but is never printed.
    assert!(registry.get("e1").is_none());
    assert_eq!(registry.get("e2").map(|r| r.name.as_str()), Some("Send"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_empty_registry() {
    let mut doc = load(CapturedElement::new("body"));
    let tree = normalized(&mut doc);
    let mut registry = ElementRegistry::new();
    registry.visit(&doc, &tree);

    assert!(registry.is_empty());
}

#[test]
fn test_record_serialization_skips_absent_fields() {
    let mut doc = load(form_page());
    let tree = normalized(&mut doc);
    let mut registry = ElementRegistry::new();
    registry.register_tree(&doc, &tree);

    let json = serde_json::to_value(registry.get("e1").unwrap()).unwrap();
    assert!(json.get("href").is_none());
    assert!(json.get("checked").is_none());
    assert_eq!(json["tag"], "form");
    assert!(json["rects"].is_array());
}
