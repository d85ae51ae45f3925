//! # Generic Messages
//!
//! Requests flowing from a [`ResourceClient`](crate::ResourceClient) into a
//! [`ResourceActor`](crate::ResourceActor), and the change events the actor
//! publishes after every successful mutation.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants follow the resource lifecycle: `Create`, `Get`, `List`,
/// `Update`, `Delete`, plus `Action` for entity-specific state transitions
/// that do not fit plain CRUD.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// Every entity, in insertion order.
    List { respond_to: Response<Vec<T>> },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// A committed change to the actor's store.
///
/// Events are published only after the mutation succeeded, in the exact order
/// the actor applied them. Subscribers therefore see a faithful replay of the
/// store's history.
#[derive(Debug, Clone)]
pub enum ResourceEvent<T: ActorEntity> {
    Created { id: T::Id, entity: T },
    /// Emitted after a successful `Update` or `Action`; carries the new state.
    Updated { id: T::Id, entity: T },
    Deleted { id: T::Id },
}

impl<T: ActorEntity> ResourceEvent<T> {
    pub fn id(&self) -> &T::Id {
        match self {
            ResourceEvent::Created { id, .. }
            | ResourceEvent::Updated { id, .. }
            | ResourceEvent::Deleted { id } => id,
        }
    }

    /// The entity state after the change, or `None` for deletions.
    pub fn entity(&self) -> Option<&T> {
        match self {
            ResourceEvent::Created { entity, .. } | ResourceEvent::Updated { entity, .. } => {
                Some(entity)
            }
            ResourceEvent::Deleted { .. } => None,
        }
    }
}
