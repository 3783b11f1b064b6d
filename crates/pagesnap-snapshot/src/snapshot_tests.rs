use super::*;

fn snapshot(text: &str) -> PageSnapshot {
    PageSnapshot {
        url: "https://example.com/".to_string(),
        elements: BTreeMap::new(),
        snapshot: text.to_string(),
        metadata: SnapshotMetadata {
            captured_at: Utc::now(),
            element_count: 0,
            viewport: ViewportInfo::default(),
        },
    }
}

#[test]
fn test_formatted_wraps_in_yaml_block() {
    let snap = snapshot("- button \"Go\" [ref=e1]");
    assert_eq!(
        snap.formatted(),
        "- Page Snapshot\n```yaml\n- button \"Go\" [ref=e1]\n```"
    );
}

#[test]
fn test_diff_identical() {
    let snap = snapshot("- button \"Go\" [ref=e1]\n- link \"Home\" [ref=e2]");
    assert_eq!(
        snap.diff_against("- button \"Go\" [ref=e1]\n- link \"Home\" [ref=e2]"),
        "- Page Snapshot (no structural changes)"
    );
}

#[test]
fn test_diff_marks_changes() {
    let snap = snapshot("- heading \"Cart\" [level=1] [ref=e1]\n- button \"Pay\" [ref=e2]\n- link \"Help\" [ref=e3]");
    let previous = "- heading \"Cart\" [level=1] [ref=e1]\n- button \"Checkout\" [ref=e2]\n- link \"Help\" [ref=e3]";

    let diff = snap.diff_against(previous);
    let lines: Vec<&str> = diff.lines().collect();
    assert_eq!(
        lines,
        vec![
            "- Page Snapshot (diff)",
            "```diff",
            "--- prev",
            "+++ curr",
            "@@ -1,3 +1,3 @@",
            " - heading \"Cart\" [level=1] [ref=e1]",
            "-- button \"Checkout\" [ref=e2]",
            "+- button \"Pay\" [ref=e2]",
            " - link \"Help\" [ref=e3]",
            "```",
        ]
    );
}

#[test]
fn test_unified_hunks_insertions_and_deletions() {
    let old = ["a", "b", "c", "d"];
    let new = ["a", "c", "d", "e"];
    assert_eq!(
        unified_hunks(&old, &new, 3),
        vec!["@@ -1,4 +1,4 @@", " a", "-b", " c", " d", "+e"]
    );

    assert_eq!(unified_hunks(&[], &["x"], 3), vec!["@@ -0,0 +1 @@", "+x"]);
    assert_eq!(unified_hunks(&["x"], &[], 3), vec!["@@ -1 +0,0 @@", "-x"]);
    assert_eq!(unified_hunks(&["x"], &["y"], 3), vec!["@@ -1 +1 @@", "-x", "+y"]);
}

#[test]
fn test_single_change_yields_small_hunk() {
    let previous: Vec<String> = (1..=50).map(|i| format!("- button \"Item {}\" [ref=e{}]", i, i)).collect();
    let mut current = previous.clone();
    current[49] = "- button \"Item 50 (sold out)\" [ref=e50]".to_string();

    let snap = snapshot(&current.join("\n"));
    let diff = snap.diff_against(&previous.join("\n"));
    let lines: Vec<&str> = diff.lines().collect();
    assert_eq!(
        lines,
        vec![
            "- Page Snapshot (diff)",
            "```diff",
            "--- prev",
            "+++ curr",
            "@@ -47,4 +47,4 @@",
            " - button \"Item 47\" [ref=e47]",
            " - button \"Item 48\" [ref=e48]",
            " - button \"Item 49\" [ref=e49]",
            "-- button \"Item 50\" [ref=e50]",
            "+- button \"Item 50 (sold out)\" [ref=e50]",
            "```",
        ]
    );
}

#[test]
fn test_distant_changes_get_separate_hunks() {
    let old: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
    let mut new = old.clone();
    new[2] = "changed 2".to_string();
    new[17] = "changed 17".to_string();
    let old: Vec<&str> = old.iter().map(String::as_str).collect();
    let new: Vec<&str> = new.iter().map(String::as_str).collect();

    let hunks = unified_hunks(&old, &new, 3);
    let headers: Vec<&String> = hunks.iter().filter(|l| l.starts_with("@@")).collect();
    assert_eq!(headers, vec!["@@ -1,6 +1,6 @@", "@@ -15,6 +15,6 @@"]);

    // Six unchanged lines between changes still share one hunk; seven split it.
    let mut shared = old.clone();
    shared[2] = "changed 2";
    shared[9] = "changed 9";
    let hunks = unified_hunks(&old, &shared, 3);
    assert_eq!(hunks.iter().filter(|l| l.starts_with("@@")).count(), 1);

    let mut split = old.clone();
    split[2] = "changed 2";
    split[10] = "changed 10";
    let hunks = unified_hunks(&old, &split, 3);
    assert_eq!(hunks.iter().filter(|l| l.starts_with("@@")).count(), 2);
}

#[test]
fn test_diff_from_empty_previous() {
    let snap = snapshot("- button \"Go\" [ref=e1]");
    let diff = snap.diff_against("");
    assert!(diff.starts_with("- Page Snapshot (diff)"));
    assert!(diff.contains("+- button \"Go\" [ref=e1]"));
}

#[test]
fn test_extract_refs() {
    let text = "- list \"Nav\" [ref=e1]\n  - link \"Home\" [ref=e2] [cursor=pointer]\n  - text \"plain\"";
    assert_eq!(extract_refs(text), vec!["e1", "e2"]);

    let snap = snapshot("- button \"Go\" [ref=e1]\n- link \"Home\" [ref=e12]");
    assert_eq!(snap.refs_in_text(), vec!["e1", "e12"]);
}

#[test]
fn test_extract_refs_ignores_quoted_text() {
    let text = "- text \"see [ref=e9] here\"\n- button \"say \\\"[ref=e7]\\\" \\\\\" [ref=e2]";
    assert_eq!(extract_refs(text), vec!["e2"]);
}

#[test]
fn test_to_json_round_trip() {
    let snap = snapshot("- button \"Go\" [ref=e1]");
    let json = snap.to_json().unwrap();
    let parsed: PageSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snap);
    assert!(json.contains("\"captured_at\""));
}
