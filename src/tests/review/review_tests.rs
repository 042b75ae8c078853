use super::*;
use crate::model::PatternId;

fn record(label: &str, selected: bool) -> PatternRecord {
    PatternRecord {
        label: label.to_string(),
        selected,
        id: PatternId::generate(),
    }
}

fn page(files: &[(&str, bool)]) -> PageSnapshot {
    PageSnapshot::new(
        files
            .iter()
            .map(|(path, viewed)| PageFile {
                path: path.to_string(),
                viewed: *viewed,
            })
            .collect(),
    )
}

#[test]
fn mark_toggles_only_unviewed_matches() {
    let mut snapshot = page(&[
        ("a/x.go", false),
        ("a/y.go", true),
        ("b/z.go", false),
        ("c/w.go", false),
    ]);
    let patterns = vec![record("/^a\\//", true), record("/^b\\//", true), record("/^c\\//", false)];

    let toggled = apply_bulk_action(&mut snapshot, &patterns, BulkAction::MarkViewed);
    assert_eq!(toggled, vec!["a/x.go".to_string(), "b/z.go".to_string()]);
    assert_eq!(snapshot.is_viewed("a/x.go"), Some(true));
    assert_eq!(snapshot.is_viewed("a/y.go"), Some(true));
    assert_eq!(snapshot.is_viewed("b/z.go"), Some(true));
    assert_eq!(snapshot.is_viewed("c/w.go"), Some(false));
}

#[test]
fn unmark_toggles_only_viewed_matches() {
    let mut snapshot = page(&[("a/x.go", true), ("a/y.go", false), ("b/z.go", true)]);
    let patterns = vec![record("/^a\\//", true)];

    let toggled = apply_bulk_action(&mut snapshot, &patterns, BulkAction::UnmarkViewed);
    assert_eq!(toggled, vec!["a/x.go".to_string()]);
    assert_eq!(snapshot.is_viewed("a/x.go"), Some(false));
    assert_eq!(snapshot.is_viewed("a/y.go"), Some(false));
    assert_eq!(snapshot.is_viewed("b/z.go"), Some(true));
}

#[test]
fn malformed_selected_pattern_toggles_nothing() {
    let mut snapshot = page(&[("[", false), ("a/[b", false)]);
    let before = snapshot.clone();
    let toggled = apply_bulk_action(&mut snapshot, &[record("/[/", true)], BulkAction::MarkViewed);
    assert!(toggled.is_empty());
    assert_eq!(snapshot, before);
}

#[test]
fn repeated_path_is_toggled_once() {
    let mut snapshot = page(&[("a/x.go", false), ("b/y.go", false), ("a/x.go", false)]);
    let toggled = apply_bulk_action(
        &mut snapshot,
        &[record("/^a\\//", true)],
        BulkAction::MarkViewed,
    );
    assert_eq!(toggled, vec!["a/x.go".to_string()]);
    assert!(snapshot.files.iter().filter(|f| f.path == "a/x.go").all(|f| f.viewed));
    assert_eq!(snapshot.is_viewed("b/y.go"), Some(false));
}

#[test]
fn plan_is_in_page_order() {
    let files = vec![
        ("z/last.md".to_string(), false),
        ("a/first.md".to_string(), false),
    ];
    let matchers = crate::matcher::compile_selected(&[record("/\\.md$/", true)]);
    assert_eq!(
        plan_toggles(&files, &matchers, BulkAction::MarkViewed),
        vec!["z/last.md".to_string(), "a/first.md".to_string()]
    );
}

#[test]
fn summary_surfaces_compile_errors() {
    let paths = ["a/x.go", "a/y.go", "b/z.go"];
    let patterns = vec![record("/^a\\//", false), record("/[/", true)];
    let rows = summarize(&paths, &patterns);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].matches, 2);
    assert!(rows[0].error.is_none());
    assert_eq!(rows[1].matches, 0);
    assert!(rows[1].error.is_some());
    assert_eq!(rows[1].record, patterns[1]);
}

#[test]
fn snapshot_paths_are_deduplicated() {
    let snapshot = page(&[("a", false), ("b", true), ("a", true)]);
    assert_eq!(
        snapshot.current_file_paths(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn snapshot_parses_page_json() {
    let snapshot: PageSnapshot =
        serde_json::from_str(r#"[{"path":"a/x.go","viewed":true},{"path":"b/y.go"}]"#).unwrap();
    assert_eq!(snapshot.is_viewed("a/x.go"), Some(true));
    assert_eq!(snapshot.is_viewed("b/y.go"), Some(false));
    assert_eq!(snapshot.is_viewed("c/z.go"), None);
}
