use cafe_orders::assistant::mock::ScriptedAssistant;
use cafe_orders::catalog::{default_menu, Catalog};
use cafe_orders::config::CafeConfig;
use cafe_orders::lifecycle::CafeSystem;
use cafe_orders::model::{OrderId, OrderStatus, RequestedItem, Sender};
use cafe_orders::notification::Severity;
use cafe_orders::order_actor::{OrderError, OrderFilter};
use cafe_orders::persistence::{merge_snapshot, MemorySnapshotStore, SnapshotStore};
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

/// Full end-to-end test: conversation, staff review, notifications and persistence.
#[tokio::test]
async fn test_full_cafe_flow() {
    let memory = Arc::new(MemorySnapshotStore::new());
    let mut system = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;
    let mut feed = system.take_status_feed().expect("feed available once");
    assert!(system.take_status_feed().is_none());

    // The customer orders through the assistant
    let assistant = Arc::new(ScriptedAssistant::new());
    assistant.push_place_order(vec![
        RequestedItem::new("coffee-001", 2),
        RequestedItem::new("pastry-001", 1),
    ]);
    let mut session = system.new_session(assistant.clone());
    assert_eq!(session.greeting(), system.settings.welcome_message);

    let reply = session.handle_user_message("Two espressos and a croissant").await;
    assert_eq!(reply.sender, Sender::System);
    let order = reply.order.expect("order created");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, dec!(10.00));
    assert_eq!(order.lines.len(), 2);
    assert!(reply.display_text.contains(order.id.short()));

    let placed = feed.recv().await.expect("placed notification");
    assert_eq!(placed.sender, Sender::System);
    assert_eq!(placed.message.severity, Severity::Pending);
    assert_eq!(placed.message.order_id, order.id);

    // Staff approves it
    let pending = system.order_client.query(OrderFilter::Pending).await.unwrap();
    assert_eq!(pending.len(), 1);

    let approved = system.order_client.approve(&order.id, "UPS123").await.unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);
    assert_eq!(approved.tracking_number.as_deref(), Some("UPS123"));

    let update = feed.recv().await.expect("approval notification");
    assert_eq!(update.message.severity, Severity::Success);
    assert!(update.message.body.contains("UPS123"));

    // Terminal orders cannot move again
    let err = system.order_client.reject(&order.id).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            id: order.id.clone(),
            from: OrderStatus::Approved,
            to: OrderStatus::Rejected,
        }
    );
    assert!(system
        .order_client
        .query(OrderFilter::Pending)
        .await
        .unwrap()
        .is_empty());

    drop(session);
    drop(feed);
    system.shutdown().await.expect("clean shutdown");

    let saved = merge_snapshot(&memory.contents().expect("snapshot written")).unwrap();
    assert_eq!(saved.orders.len(), 1);
    assert_eq!(saved.orders[0].status, OrderStatus::Approved);
    assert_eq!(saved.orders[0].tracking_number.as_deref(), Some("UPS123"));
}

#[tokio::test]
async fn test_staff_errors() {
    let memory = Arc::new(MemorySnapshotStore::new());
    let system = CafeSystem::start(&CafeConfig::default(), memory).await;
    let orders = &system.order_client;

    let missing = OrderId::new("order-404");
    assert_eq!(
        orders.reject(&missing).await.unwrap_err(),
        OrderError::NotFound(missing.clone())
    );
    assert_eq!(
        orders.approve(&missing, "UPS1").await.unwrap_err(),
        OrderError::NotFound(missing)
    );

    let order = orders
        .place_order(&[RequestedItem::new("salad-001", 1)])
        .await
        .unwrap();
    assert_eq!(
        orders.approve(&order.id, "   ").await.unwrap_err(),
        OrderError::MissingTrackingNumber(order.id.clone())
    );

    // A failed approval leaves the order untouched
    let still_pending = orders.query(OrderFilter::Pending).await.unwrap();
    assert_eq!(still_pending.len(), 1);
    assert_eq!(still_pending[0].status, OrderStatus::Pending);
    assert_eq!(still_pending[0].tracking_number, None);

    let rejected = orders.reject(&order.id).await.unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.tracking_number, None);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_manual_orders_are_approved_on_entry() {
    let memory = Arc::new(MemorySnapshotStore::new());
    let system = CafeSystem::start(&CafeConfig::default(), memory).await;
    let orders = &system.order_client;

    let manual = orders
        .create_manual(&[RequestedItem::new("sandwich-001", 2)], " FEDEX9 ")
        .await
        .unwrap();
    assert_eq!(manual.status, OrderStatus::Approved);
    assert_eq!(manual.tracking_number.as_deref(), Some("FEDEX9"));
    assert_eq!(manual.total, dec!(17.00));

    assert!(matches!(
        orders
            .create_manual(&[RequestedItem::new("sandwich-001", 1)], "")
            .await,
        Err(OrderError::MissingTrackingNumber(_))
    ));
    assert!(matches!(
        orders.create_manual(&[], "FEDEX9").await,
        Err(OrderError::InvalidOrder(_))
    ));

    let processed = orders.query(OrderFilter::Processed).await.unwrap();
    assert_eq!(processed.len(), 1);
    assert!(orders.query(OrderFilter::Pending).await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_orders_survive_a_restart() {
    let memory = Arc::new(MemorySnapshotStore::new());

    let system = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;
    let first = system
        .order_client
        .place_order(&[RequestedItem::new("coffee-002", 1)])
        .await
        .unwrap();
    let second = system
        .order_client
        .place_order(&[RequestedItem::new("coffee-001", 3)])
        .await
        .unwrap();
    system.order_client.reject(&first.id).await.unwrap();
    system.shutdown().await.unwrap();

    let restarted = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;
    let all = restarted.order_client.query(OrderFilter::All).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].status, OrderStatus::Rejected);

    // Restored orders keep their state machine
    let approved = restarted
        .order_client
        .approve(&second.id, "DHL77")
        .await
        .unwrap();
    assert_eq!(approved.total, dec!(10.50));

    // New ids never collide with restored ones
    let third = restarted
        .order_client
        .place_order(&[RequestedItem::new("pastry-001", 1)])
        .await
        .unwrap();
    assert_ne!(third.id, first.id);
    assert_ne!(third.id, second.id);
    restarted.shutdown().await.unwrap();

    let saved = merge_snapshot(&memory.contents().unwrap()).unwrap();
    assert_eq!(saved.orders.len(), 3);
}

#[tokio::test]
async fn test_failed_saves_do_not_block_orders() {
    let memory = Arc::new(MemorySnapshotStore::new());
    memory.set_fail_writes(true);
    let system = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;

    let order = system
        .order_client
        .place_order(&[RequestedItem::new("coffee-001", 1)])
        .await
        .unwrap();
    let approved = system.order_client.approve(&order.id, "UPS5").await.unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);

    system.shutdown().await.unwrap();
    assert_eq!(memory.load_raw().await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_from_seed() {
    let memory = Arc::new(MemorySnapshotStore::with_contents("{ definitely not json"));
    let system = CafeSystem::start(&CafeConfig::default(), memory).await;

    assert_eq!(system.settings.cafe_name, "Stanley's Cafe");
    assert!(system
        .order_client
        .query(OrderFilter::All)
        .await
        .unwrap()
        .is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_repeated_snapshot_ids_resolve_to_one_order() {
    let order = |total: f64| {
        json!({
            "id": "order-1",
            "lines": [],
            "total": total,
            "status": "PENDING",
            "createdAt": "2024-05-01T10:00:00Z"
        })
    };
    let raw = json!({ "orders": [order(3.5), order(9.0)] }).to_string();
    let memory = Arc::new(MemorySnapshotStore::with_contents(raw));
    let id = OrderId::new("order-1");

    let system = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;
    let all = system.order_client.query(OrderFilter::All).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].total, dec!(3.5));

    system.order_client.approve(&id, "UPS42").await.unwrap();
    system.shutdown().await.unwrap();

    let saved = merge_snapshot(&memory.contents().unwrap()).unwrap();
    assert_eq!(saved.orders.len(), 1);
    assert_eq!(saved.orders[0].status, OrderStatus::Approved);

    let restarted = CafeSystem::start(&CafeConfig::default(), memory).await;
    let all = restarted.order_client.query(OrderFilter::All).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, OrderStatus::Approved);
    assert_eq!(all[0].tracking_number.as_deref(), Some("UPS42"));
    assert_eq!(all[0].total, dec!(3.5));
    restarted.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restored_orders_keep_their_prices() {
    let memory = Arc::new(MemorySnapshotStore::new());

    let system = CafeSystem::start(&CafeConfig::default(), memory.clone()).await;
    let placed = system
        .order_client
        .place_order(&[RequestedItem::new("coffee-001", 2)])
        .await
        .unwrap();
    assert_eq!(placed.total, dec!(7.00));
    system.shutdown().await.unwrap();

    // The espresso gets more expensive between runs
    let mut menu = default_menu();
    for item in menu.iter_mut().filter(|item| item.id == "coffee-001") {
        item.unit_price = dec!(5.00);
    }
    let restarted =
        CafeSystem::start_with_catalog(&CafeConfig::default(), memory, Catalog::new(menu)).await;

    let all = restarted.order_client.query(OrderFilter::All).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, placed.id);
    assert_eq!(all[0].total, dec!(7.00));
    assert_eq!(all[0].lines[0].unit_price, dec!(3.50));

    // Approval does not reprice either
    let approved = restarted.order_client.approve(&placed.id, "UPS8").await.unwrap();
    assert_eq!(approved.total, dec!(7.00));

    let fresh = restarted
        .order_client
        .place_order(&[RequestedItem::new("coffee-001", 2)])
        .await
        .unwrap();
    assert_eq!(fresh.total, dec!(10.00));
    restarted.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_feed_reports_only_changes_after_it_is_taken() {
    let mut system = CafeSystem::start(&CafeConfig::default(), Arc::new(MemorySnapshotStore::new())).await;

    // Nobody listens yet, so nothing is queued for these
    let first = system
        .order_client
        .place_order(&[RequestedItem::new("coffee-002", 1)])
        .await
        .unwrap();
    system
        .order_client
        .place_order(&[RequestedItem::new("pastry-001", 1)])
        .await
        .unwrap();

    let mut feed = system.take_status_feed().expect("feed available once");
    assert!(system.take_status_feed().is_none());

    system.order_client.approve(&first.id, "UPS9").await.unwrap();
    let entry = feed.recv().await.expect("approval notification");
    assert_eq!(entry.message.severity, Severity::Success);
    assert_eq!(entry.message.order_id, first.id);

    system.shutdown().await.unwrap();
    assert!(feed.recv().await.is_none());
}
