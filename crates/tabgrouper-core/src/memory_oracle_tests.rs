use super::*;
use crate::event_relay::SidebarMessage;

fn oracle_with_relay(
    tabs: Vec<Tab>,
) -> (MemoryTabOracle, tokio::sync::mpsc::UnboundedReceiver<SidebarMessage>) {
    let (relay, rx) = EventRelay::channel();
    (MemoryTabOracle::new(tabs).with_relay(relay), rx)
}

fn next_event(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SidebarMessage>) -> Option<TabEvent> {
    match rx.try_recv() {
        Ok(SidebarMessage::Tab(event)) => Some(event),
        _ => None,
    }
}

#[tokio::test]
async fn test_query_and_get() {
    let oracle = MemoryTabOracle::new(vec![Tab::new(1, "a", "u"), Tab::new(2, "b", "u")]);
    assert_eq!(oracle.query_tabs().await.unwrap().len(), 2);
    assert_eq!(oracle.get_tab(2).await.unwrap().title, "b");
    assert!(matches!(
        oracle.get_tab(9).await,
        Err(TabOracleError::TabNotFound(9))
    ));
}

#[tokio::test]
async fn test_open_tab_with_opener_emits_parent() {
    let (oracle, mut rx) = oracle_with_relay(vec![Tab::new(5, "Parent", "u")]);
    let id = oracle.open_tab("Child", "https://c", Some(5));
    assert_eq!(id, 6);

    match next_event(&mut rx) {
        Some(TabEvent::Created { tab, opener, has_parent }) => {
            assert_eq!(tab.id, 6);
            assert_eq!(tab.opener_id, Some(5));
            assert!(has_parent);
            assert_eq!(opener.map(|o| o.id()), Some(5));
        }
        other => panic!("Expected Created, got {:?}", other),
    }
}

#[tokio::test]
async fn test_open_tab_with_closed_opener_has_no_parent() {
    let (oracle, mut rx) = oracle_with_relay(vec![]);
    oracle.open_tab("Child", "https://c", Some(42));
    match next_event(&mut rx) {
        Some(TabEvent::Created { opener, has_parent, .. }) => {
            assert!(!has_parent);
            assert!(opener.is_none());
        }
        other => panic!("Expected Created, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_emits_only_changes() {
    let (oracle, mut rx) = oracle_with_relay(vec![Tab::new(1, "Same", "u")]);

    oracle.set_title(1, "Same").unwrap();
    assert!(next_event(&mut rx).is_none());

    oracle.set_title(1, "Changed").unwrap();
    assert_eq!(
        next_event(&mut rx),
        Some(TabEvent::Updated {
            tab_id: 1,
            title: Some("Changed".to_string()),
            favicon: None,
        })
    );

    oracle.set_favicon(1, "f.ico").unwrap();
    oracle.set_favicon(1, "f.ico").unwrap();
    assert!(matches!(next_event(&mut rx), Some(TabEvent::Updated { favicon: Some(_), .. })));
    assert!(next_event(&mut rx).is_none());
}

#[tokio::test]
async fn test_activate_and_remove() {
    let (oracle, mut rx) = oracle_with_relay(vec![Tab::new(1, "a", "u")]);

    oracle.activate_tab(1).await.unwrap();
    assert_eq!(oracle.active_tab(), Some(1));
    assert_eq!(next_event(&mut rx), Some(TabEvent::Activated { tab_id: 1 }));

    oracle.remove_tab(1).await.unwrap();
    assert!(oracle.active_tab().is_none());
    assert_eq!(next_event(&mut rx), Some(TabEvent::Removed { tab_id: 1 }));

    assert!(oracle.remove_tab(1).await.is_err());
    assert!(oracle.activate_tab(1).await.is_err());
}

#[test]
fn test_events_for_one_tab_keep_mutation_order() {
    const TABS: usize = 200;
    let (oracle, mut rx) = oracle_with_relay(vec![]);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..TABS {
                oracle.open_tab(format!("Tab {}", i), "https://t", None);
            }
        });
        scope.spawn(|| {
            let mut closed = 0;
            while closed < TABS {
                for tab in oracle.tabs() {
                    if oracle.close_tab(tab.id).is_ok() {
                        closed += 1;
                    }
                }
                std::thread::yield_now();
            }
        });
    });

    let mut created = std::collections::HashSet::new();
    let mut removed = 0;
    while let Some(event) = next_event(&mut rx) {
        match event {
            TabEvent::Created { tab, .. } => {
                created.insert(tab.id);
            }
            TabEvent::Removed { tab_id } => {
                assert!(created.contains(&tab_id), "tab {} removed before created", tab_id);
                removed += 1;
            }
            other => panic!("Unexpected event {:?}", other),
        }
    }
    assert_eq!(created.len(), TABS);
    assert_eq!(removed, TABS);
    assert!(oracle.tabs().is_empty());
}
