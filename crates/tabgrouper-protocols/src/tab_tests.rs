use super::*;

#[test]
fn test_snapshot_indices_follow_input_order() {
    let snapshot = TabSnapshot::new(vec![
        (Tab::new(40, "Docs", "https://docs.rs"), None),
        (Tab::new(7, "Crates", "https://crates.io"), None),
        (Tab::new(12, "Blog", "https://blog.rust-lang.org"), None),
    ]);

    assert_eq!(snapshot.len(), 3);
    let indices: Vec<usize> = snapshot.entries().iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(snapshot.get(1).unwrap().tab.id, 7);
    assert!(snapshot.get(3).is_none());
}

#[test]
fn test_snapshot_into_tabs_keeps_order() {
    let snapshot = TabSnapshot::new(vec![
        (Tab::new(2, "b", "https://b"), None),
        (Tab::new(1, "a", "https://a"), None),
    ]);
    let ids: Vec<TabId> = snapshot.into_tabs().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn test_empty_snapshot() {
    let snapshot = TabSnapshot::default();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.len(), 0);
}

#[test]
fn test_tab_deserializes_browser_shape() {
    let json = serde_json::json!({
        "id": 5,
        "title": "Rust",
        "url": "https://rust-lang.org",
        "favIconUrl": "https://rust-lang.org/favicon.ico",
        "openerTabId": 3
    });
    let tab: Tab = serde_json::from_value(json).unwrap();
    assert_eq!(tab.id, 5);
    assert_eq!(tab.favicon.as_deref(), Some("https://rust-lang.org/favicon.ico"));
    assert_eq!(tab.opener_id, Some(3));
}

#[test]
fn test_tab_deserializes_short_aliases() {
    let json = serde_json::json!({"id": 9, "title": "x", "url": "u", "favicon": "f", "openerId": 1});
    let tab: Tab = serde_json::from_value(json).unwrap();
    assert_eq!(tab.favicon.as_deref(), Some("f"));
    assert_eq!(tab.opener_id, Some(1));
}

#[test]
fn test_tab_serialization_skips_missing_optionals() {
    let tab = Tab::new(1, "t", "u");
    let json = serde_json::to_value(&tab).unwrap();
    assert!(json.get("favIconUrl").is_none());
    assert!(json.get("openerTabId").is_none());
}

#[test]
fn test_tab_builders() {
    let tab = Tab::new(3, "t", "u").with_favicon("icon").with_opener(1);
    assert_eq!(tab.favicon.as_deref(), Some("icon"));
    assert_eq!(tab.opener_id, Some(1));
}
