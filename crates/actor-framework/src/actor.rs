//! # Generic Actor Server
//!
//! `ResourceActor` owns the authoritative store for one entity type and
//! processes requests one at a time. Because a single task holds the store,
//! concurrent callers never race on an entity: two transitions sent at the
//! same moment are applied in arrival order against the latest state.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceEvent, ResourceRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Attempts made to draw an id that is not already present in the store.
const MAX_ID_ATTEMPTS: usize = 16;

/// The generic actor that manages a collection of entities.
///
/// Entities are kept in insertion order, which is what [`ResourceClient::list`]
/// returns. Mutating hooks run against a draft copy that is committed only when
/// the hook succeeds; each commit is then published to every subscriber
/// obtained through [`ResourceActor::subscribe`] or a [`Subscribers`] handle.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Ticket { id: u32, open: bool }
/// #[derive(Debug)] struct TicketCreate;
/// #[derive(Debug)] enum TicketUpdate {}
/// #[derive(Debug)] enum TicketAction { Close }
/// #[derive(Debug, thiserror::Error)] #[error("already closed")] struct Closed;
///
/// #[async_trait]
/// impl ActorEntity for Ticket {
///     type Id = u32; type Create = TicketCreate; type Update = TicketUpdate;
///     type Action = TicketAction; type ActionResult = (); type Context = (); type Error = Closed;
///     fn from_create_params(id: u32, _: TicketCreate) -> Result<Self, Closed> { Ok(Self { id, open: true }) }
///     async fn on_update(&mut self, update: TicketUpdate, _: &()) -> Result<(), Closed> { match update {} }
///     async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Closed> {
///         if !self.open { return Err(Closed); }
///         self.open = false;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut next = 0;
///     let (actor, client) = ResourceActor::<Ticket>::new(8, move || { next += 1; next });
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(TicketCreate).await.unwrap();
///     client.perform_action(id, TicketAction::Close).await.unwrap();
///     assert!(client.perform_action(id, TicketAction::Close).await.is_err());
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    next_id: Box<dyn FnMut() -> T::Id + Send>,
    subscribers: Subscribers<T>,
}

/// Cloneable handle to an actor's change subscribers.
///
/// Unlike [`ResourceActor::subscribe`] it keeps working after the actor has
/// been spawned. A late subscriber sees only changes committed after it
/// joined. Every stream ends when the actor shuts down; subscribing after
/// that yields a stream that is already closed.
pub struct Subscribers<T: ActorEntity> {
    // `None` once the actor has stopped.
    senders: Arc<Mutex<Option<Vec<mpsc::UnboundedSender<ResourceEvent<T>>>>>>,
}

impl<T: ActorEntity> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            senders: self.senders.clone(),
        }
    }
}

impl<T: ActorEntity> Subscribers<T> {
    fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Some(Vec::new()))),
        }
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ResourceEvent<T>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Ok(mut guard) = self.senders.lock() {
            if let Some(senders) = guard.as_mut() {
                senders.push(sender);
            }
        }
        receiver
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.senders
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn publish(&self, event: ResourceEvent<T>) {
        if let Ok(mut guard) = self.senders.lock() {
            if let Some(senders) = guard.as_mut() {
                senders.retain(|s| s.send(event.clone()).is_ok());
            }
        }
    }

    fn close(&self) {
        if let Ok(mut guard) = self.senders.lock() {
            guard.take();
        }
    }
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new actor and its client.
    ///
    /// `buffer_size` bounds the request channel; callers wait when it is full.
    /// `next_id` is invoked once per `Create` to allocate the new entity's id.
    pub fn new(
        buffer_size: usize,
        next_id: impl FnMut() -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id: Box::new(next_id),
            subscribers: Subscribers::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Pre-populates the store, e.g. from a restored snapshot.
    ///
    /// Seeded entities keep the given order and publish no events. A repeated
    /// id replaces the earlier entity in place.
    pub fn with_entities(mut self, entities: impl IntoIterator<Item = (T::Id, T)>) -> Self {
        for (id, entity) in entities {
            if self.store.insert(id.clone(), entity).is_none() {
                self.order.push(id);
            }
        }
        self
    }

    /// Registers a new change subscriber.
    ///
    /// Called before [`run`](Self::run) the receiver yields every committed
    /// change; it ends once the actor has shut down.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ResourceEvent<T>> {
        self.subscribers.subscribe()
    }

    /// A handle for subscribing once the actor is running.
    pub fn subscribers(&self) -> Subscribers<T> {
        self.subscribers.clone()
    }

    fn publish(&mut self, event: ResourceEvent<T>) {
        self.subscribers.publish(event);
    }

    fn allocate_id(&mut self) -> Option<T::Id> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            if !self.store.contains_key(&id) {
                return Some(id);
            }
        }
        None
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let Some(id) = self.allocate_id() else {
                        warn!(entity_type, "Could not allocate a free id");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(
                            "id generator kept returning ids already in use".into(),
                        )));
                        continue;
                    };

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    self.store.insert(id.clone(), item.clone());
                    self.order.push(id.clone());
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    self.publish(ResourceEvent::Created {
                        id: id.clone(),
                        entity: item,
                    });
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let items: Vec<T> = self
                        .order
                        .iter()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    if let Err(e) = draft.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), draft.clone());
                    info!(entity_type, %id, "Updated");
                    self.publish(ResourceEvent::Updated {
                        id,
                        entity: draft.clone(),
                    });
                    let _ = respond_to.send(Ok(draft));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    self.order.retain(|existing| existing != &id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    self.publish(ResourceEvent::Deleted { id });
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    match draft.handle_action(action, &context).await {
                        Ok(result) => {
                            self.store.insert(id.clone(), draft.clone());
                            info!(entity_type, %id, "Action ok");
                            self.publish(ResourceEvent::Updated { id, entity: draft });
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
            }
        }

        self.subscribers.close();
        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
