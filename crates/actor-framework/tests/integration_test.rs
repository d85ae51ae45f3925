use actor_framework::{ActorEntity, FrameworkError, ResourceActor, ResourceEvent};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Tab {
    id: u32,
    guest: String,
    balance: u32,
    settled: bool,
}

#[derive(Debug)]
struct TabCreate {
    guest: String,
}

#[derive(Debug)]
struct TabUpdate {
    guest: Option<String>,
}

#[derive(Debug)]
enum TabAction {
    Charge(u32),
    Settle,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum TabError {
    #[error("tab already settled")]
    Settled,
    #[error("guest name must not be empty")]
    EmptyGuest,
}

#[async_trait]
impl ActorEntity for Tab {
    type Id = u32;
    type Create = TabCreate;
    type Update = TabUpdate;
    type Action = TabAction;
    type ActionResult = u32;
    type Context = ();
    type Error = TabError;

    fn from_create_params(id: u32, params: TabCreate) -> Result<Self, Self::Error> {
        if params.guest.trim().is_empty() {
            return Err(TabError::EmptyGuest);
        }
        Ok(Self {
            id,
            guest: params.guest,
            balance: 0,
            settled: false,
        })
    }

    async fn on_update(&mut self, update: TabUpdate, _ctx: &Self::Context) -> Result<(), Self::Error> {
        if let Some(guest) = update.guest {
            self.guest = guest;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: TabAction, _ctx: &Self::Context) -> Result<u32, Self::Error> {
        match action {
            TabAction::Charge(amount) => {
                // Mutate before validating so rollback is observable.
                self.balance += amount;
                if self.settled {
                    return Err(TabError::Settled);
                }
                Ok(self.balance)
            }
            TabAction::Settle => {
                if self.settled {
                    return Err(TabError::Settled);
                }
                self.settled = true;
                Ok(self.balance)
            }
        }
    }
}

fn counter(start: u32) -> impl FnMut() -> u32 + Send + 'static {
    let mut next = start;
    move || {
        next += 1;
        next
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    tokio::spawn(actor.run(()));

    // 1. Create
    let id = client
        .create(TabCreate {
            guest: "Alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // 2. Actions
    assert_eq!(client.perform_action(id, TabAction::Charge(7)).await.unwrap(), 7);
    assert_eq!(client.perform_action(id, TabAction::Settle).await.unwrap(), 7);

    let err = client.perform_action(id, TabAction::Settle).await.unwrap_err();
    assert_eq!(err.downcast_entity::<TabError>().unwrap(), TabError::Settled);

    // 3. Update
    let updated = client
        .update(
            id,
            TabUpdate {
                guest: Some("Bob".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.guest, "Bob");

    // 4. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_action_leaves_entity_untouched() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    tokio::spawn(actor.run(()));

    let id = client.create(TabCreate { guest: "Cat".into() }).await.unwrap();
    client.perform_action(id, TabAction::Charge(5)).await.unwrap();
    client.perform_action(id, TabAction::Settle).await.unwrap();

    assert!(client.perform_action(id, TabAction::Charge(100)).await.is_err());

    let tab = client.get(id).await.unwrap().unwrap();
    assert_eq!(tab.balance, 5);
    assert!(tab.settled);
}

#[tokio::test]
async fn test_create_failure_is_reported_and_not_stored() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    tokio::spawn(actor.run(()));

    let err = client.create(TabCreate { guest: "  ".into() }).await.unwrap_err();
    assert_eq!(err.downcast_entity::<TabError>().unwrap(), TabError::EmptyGuest);
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    tokio::spawn(actor.run(()));

    let err = client.perform_action(42, TabAction::Settle).await.unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "42"));
}

#[tokio::test]
async fn test_list_keeps_insertion_order_after_seeding() {
    let seeded = Tab {
        id: 500,
        guest: "Seed".into(),
        balance: 3,
        settled: false,
    };
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    let actor = actor.with_entities([(seeded.id, seeded.clone())]);
    tokio::spawn(actor.run(()));

    client.create(TabCreate { guest: "Second".into() }).await.unwrap();
    client.create(TabCreate { guest: "Third".into() }).await.unwrap();

    let guests: Vec<String> = client.list().await.unwrap().into_iter().map(|t| t.guest).collect();
    assert_eq!(guests, vec!["Seed", "Second", "Third"]);
}

#[tokio::test]
async fn test_colliding_ids_are_redrawn() {
    let seeded = Tab {
        id: 1,
        guest: "Seed".into(),
        balance: 0,
        settled: false,
    };
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    let actor = actor.with_entities([(1, seeded)]);
    tokio::spawn(actor.run(()));

    let id = client.create(TabCreate { guest: "New".into() }).await.unwrap();
    assert_eq!(id, 2);
}

#[tokio::test]
async fn test_subscribers_see_committed_changes_in_order() {
    let (mut actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    let mut events = actor.subscribe();
    tokio::spawn(actor.run(()));

    let id = client.create(TabCreate { guest: "Dee".into() }).await.unwrap();
    client.perform_action(id, TabAction::Settle).await.unwrap();
    // Rejected, so no event.
    let _ = client.perform_action(id, TabAction::Settle).await;
    client.delete(id).await.unwrap();
    drop(client);

    match events.recv().await {
        Some(ResourceEvent::Created { id: got, entity }) => {
            assert_eq!(got, id);
            assert!(!entity.settled);
        }
        other => panic!("expected Created, got {:?}", other),
    }
    match events.recv().await {
        Some(ResourceEvent::Updated { entity, .. }) => assert!(entity.settled),
        other => panic!("expected Updated, got {:?}", other),
    }
    assert!(matches!(events.recv().await, Some(ResourceEvent::Deleted { .. })));
    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn test_late_subscribers_see_only_later_changes() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    let subscribers = actor.subscribers();
    let handle = tokio::spawn(actor.run(()));

    let early = client.create(TabCreate { guest: "Fay".into() }).await.unwrap();
    assert!(subscribers.is_empty());

    let mut events = subscribers.subscribe();
    client.perform_action(early, TabAction::Charge(4)).await.unwrap();

    match events.recv().await {
        Some(ResourceEvent::Updated { id, entity }) => {
            assert_eq!(id, early);
            assert_eq!(entity.balance, 4);
        }
        other => panic!("expected Updated, got {:?}", other),
    }

    drop(client);
    handle.await.unwrap();
    assert!(events.recv().await.is_none());

    // Joining a stopped actor gives a stream that is already closed
    assert!(subscribers.subscribe().recv().await.is_none());
}

#[tokio::test]
async fn test_concurrent_actions_are_serialized() {
    let (actor, client) = ResourceActor::<Tab>::new(10, counter(0));
    tokio::spawn(actor.run(()));

    let id = client.create(TabCreate { guest: "Eve".into() }).await.unwrap();

    let a = client.clone();
    let b = client.clone();
    let (first, second) = tokio::join!(
        a.perform_action(id, TabAction::Settle),
        b.perform_action(id, TabAction::Settle)
    );

    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
}
