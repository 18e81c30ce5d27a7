use super::*;

#[tokio::test]
async fn remove_releases_preview_and_result_exactly_once() {
    let manager = create_test_manager(ScriptedProcessor::new());

    let id = manager.add_files(vec![png("a.png")]).await.unwrap().accepted[0];
    manager.wait_idle().await;
    let item = manager.item(id).unwrap();
    assert_eq!(manager.live_handles(), 2);

    let removed = manager.remove_item(id).expect("item was present");

    assert_eq!(removed.id, id);
    assert_eq!(removed.status, ItemStatus::Done);
    assert_eq!(manager.live_handles(), 0);
    assert!(matches!(
        manager.resource(item.preview).unwrap_err(),
        Error::Resource(ResourceError::UnknownHandle { .. })
    ));
    assert!(manager.resource(item.result.unwrap()).is_err());
    assert!(manager.remove_item(id).is_none(), "second removal is a no-op");
    assert_invariants(&manager);
}

#[tokio::test]
async fn remove_of_unknown_item_is_a_silent_noop() {
    let manager = create_test_manager(ScriptedProcessor::new());
    manager.add_files(vec![png("a.png")]).await.unwrap();
    manager.wait_idle().await;
    let mut events = manager.subscribe();

    assert!(manager.remove_item(ItemId(999)).is_none());

    assert_eq!(manager.items().len(), 1);
    assert_eq!(manager.live_handles(), 2);
    assert!(drain_events(&mut events).is_empty());
}

#[tokio::test]
async fn removing_selected_item_falls_back_to_most_recent_remaining() {
    let processor = ScriptedProcessor::new();
    let manager = create_test_manager(processor);
    let ids = manager
        .add_files(vec![png("a.png"), png("b.png"), png("c.png")])
        .await
        .unwrap()
        .accepted;
    manager.wait_idle().await;
    manager.select(ids[0]);
    let mut events = manager.subscribe();

    manager.remove_item(ids[0]);
    assert_eq!(manager.current(), Some(ids[2]));

    manager.remove_item(ids[2]);
    assert_eq!(manager.current(), Some(ids[1]));

    manager.remove_item(ids[1]);
    assert_eq!(manager.current(), None);
    assert_invariants(&manager);

    assert_eq!(
        drain_events(&mut events),
        vec![
            Event::ItemRemoved { id: ids[0] },
            Event::SelectionChanged { id: Some(ids[2]) },
            Event::ItemRemoved { id: ids[2] },
            Event::SelectionChanged { id: Some(ids[1]) },
            Event::ItemRemoved { id: ids[1] },
            Event::SelectionChanged { id: None },
        ]
    );
}

#[tokio::test]
async fn removing_unselected_item_keeps_selection() {
    let manager = create_test_manager(ScriptedProcessor::new());
    let ids = manager
        .add_files(vec![png("a.png"), png("b.png")])
        .await
        .unwrap()
        .accepted;
    manager.wait_idle().await;
    let mut events = manager.subscribe();

    manager.remove_item(ids[0]);

    assert_eq!(manager.current(), Some(ids[1]));
    assert_eq!(
        drain_events(&mut events),
        vec![Event::ItemRemoved { id: ids[0] }]
    );
}

#[tokio::test]
async fn select_is_unconditional_and_repaired_on_next_store_change() {
    let processor = ScriptedProcessor::new();
    let manager = create_test_manager(processor);
    let a = manager.add_files(vec![png("a.png")]).await.unwrap().accepted[0];

    assert!(manager.select(ItemId(999)));
    assert_eq!(manager.current(), Some(ItemId(999)));
    let selection = manager.selected_item();
    assert_eq!(selection.id, Some(ItemId(999)));
    assert!(selection.item.is_none(), "dangling selection has no snapshot");

    let b = manager.add_files(vec![png("b.png")]).await.unwrap().accepted[0];

    assert_ne!(a, b);
    assert_eq!(manager.current(), Some(b));
    assert_invariants(&manager);
}

#[tokio::test]
async fn select_publishes_only_actual_changes() {
    let manager = create_test_manager(ScriptedProcessor::new());
    let ids = manager
        .add_files(vec![png("a.png"), png("b.png")])
        .await
        .unwrap()
        .accepted;
    manager.wait_idle().await;
    let mut events = manager.subscribe();

    assert!(manager.select(ids[0]));
    assert!(!manager.select(ids[0]));

    assert_eq!(
        drain_events(&mut events),
        vec![Event::SelectionChanged { id: Some(ids[0]) }]
    );
    let selection = manager.selected_item();
    assert_eq!(selection.item.map(|i| i.name), Some("a.png".to_string()));
}

#[tokio::test]
async fn lookups_of_unknown_items_report_not_found() {
    let manager = create_test_manager(ScriptedProcessor::new());

    for err in [
        manager.item(ItemId(1)).unwrap_err(),
        manager.preview(ItemId(1)).unwrap_err(),
        manager.result(ItemId(1)).unwrap_err(),
    ] {
        assert!(
            matches!(err, Error::Item(ItemError::NotFound { id }) if id == ItemId(1)),
            "got {err:?}"
        );
    }
}
