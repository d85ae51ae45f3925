//! Pure data structures shared by the order pipeline.
//!
//! [`Order`] is the entity managed by the order actor (see
//! [`crate::order_actor`]); everything else here is plain serde data that
//! travels inside the persisted [`AppStore`] snapshot.

pub mod catalog;
pub mod chat;
pub mod order;
pub mod store;

pub use catalog::*;
pub use chat::*;
pub use order::*;
pub use store::*;
