//! # Actor Framework
//!
//! Building blocks for type-safe, resource-oriented actors on top of Tokio.
//!
//! A [`ResourceActor`] is a single task that owns every instance of one entity
//! type. Callers talk to it through a cloneable [`ResourceClient`]; each call is
//! a message with a oneshot reply. Because the store has exactly one owner,
//! operations on the same entity are applied strictly in arrival order and no
//! locks are needed.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and its transitions
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, id allocation, change events
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed request/response
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor, ResourceEvent};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Table {
//!     id: u32,
//!     seats: u8,
//!     reserved: bool,
//! }
//!
//! #[derive(Debug)] struct TableCreate { seats: u8 }
//! #[derive(Debug)] struct TableUpdate { seats: Option<u8> }
//! #[derive(Debug)] enum TableAction { Reserve }
//!
//! #[derive(Debug, thiserror::Error)]
//! enum TableError {
//!     #[error("table already reserved")]
//!     AlreadyReserved,
//! }
//!
//! #[async_trait]
//! impl ActorEntity for Table {
//!     type Id = u32;
//!     type Create = TableCreate;
//!     type Update = TableUpdate;
//!     type Action = TableAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = TableError;
//!
//!     fn from_create_params(id: u32, params: TableCreate) -> Result<Self, TableError> {
//!         Ok(Self { id, seats: params.seats, reserved: false })
//!     }
//!
//!     async fn on_update(&mut self, update: TableUpdate, _: &()) -> Result<(), TableError> {
//!         if let Some(seats) = update.seats { self.seats = seats; }
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: TableAction, _: &()) -> Result<(), TableError> {
//!         match action {
//!             TableAction::Reserve if self.reserved => Err(TableError::AlreadyReserved),
//!             TableAction::Reserve => {
//!                 self.reserved = true;
//!                 Ok(())
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut next = 100;
//!     let (mut actor, client) = ResourceActor::<Table>::new(10, move || { next += 1; next });
//!     let mut events = actor.subscribe();
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(TableCreate { seats: 4 }).await.unwrap();
//!     client.perform_action(id, TableAction::Reserve).await.unwrap();
//!
//!     let err = client.perform_action(id, TableAction::Reserve).await.unwrap_err();
//!     assert!(matches!(err.downcast_entity::<TableError>(), Ok(TableError::AlreadyReserved)));
//!
//!     assert!(matches!(events.recv().await, Some(ResourceEvent::Created { .. })));
//!     assert!(matches!(events.recv().await, Some(ResourceEvent::Updated { .. })));
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies reach an entity's hooks through [`ActorEntity::Context`], which
//! is handed to [`ResourceActor::run`] when the actor is started rather than
//! when it is constructed.
//!
//! ## Testing
//!
//! The [`mock`] module provides stand-ins for the actor side of a
//! [`ResourceClient`], so client façades can be tested without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::{ResourceActor, Subscribers};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceEvent, ResourceRequest, Response};
