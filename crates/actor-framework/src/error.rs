//! # Framework Errors
//!
//! Errors raised by the actor runtime itself. Domain failures produced inside
//! entity hooks are carried opaquely in [`FrameworkError::EntityError`] and
//! recovered by the typed client with [`FrameworkError::downcast_entity`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error, if this is an `EntityError` of type `E`.
    ///
    /// Returns the original error unchanged when the payload is some other type,
    /// so callers can fall back to a generic mapping.
    pub fn downcast_entity<E>(self) -> Result<E, Self>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(inner) => Err(FrameworkError::EntityError(inner)),
            },
            other => Err(other),
        }
    }
}
