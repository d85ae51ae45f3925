//! Runtime orchestration and lifecycle management.
//!
//! - [`CafeSystem`] - starts the order actor, the snapshot writer and the
//!   status feed, and shuts them down in order
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod cafe_system;
pub mod tracing;

pub use cafe_system::*;
pub use tracing::*;
