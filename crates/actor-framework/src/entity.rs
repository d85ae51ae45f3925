//! # ActorEntity Trait
//!
//! The contract a resource type implements to be owned by a
//! [`ResourceActor`](crate::ResourceActor). Associated types pin down the id, the
//! create/update payloads, the custom actions and the error type, so a client
//! for one resource cannot send another resource's payloads.
//!
//! Hooks run inside the actor task with exclusive `&mut` access to the entity.
//! A hook that returns `Err` leaves the store untouched: the actor only commits
//! (and publishes a [`ResourceEvent`](crate::ResourceEvent)) after success, so
//! hooks must validate before they mutate.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// `Context` is injected into every hook when the actor is started with
/// [`ResourceActor::run`](crate::ResourceActor::run), which lets entities reach
/// dependencies wired after construction. Use `()` when there are none.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. state-machine transitions).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into the actor.
    type Context: Send + Sync;

    /// One error enum per entity, shared by all of its hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from its freshly allocated id and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the entity is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
