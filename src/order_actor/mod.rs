//! The Order Store: orders as a resource actor with an approve/reject state machine.

mod actions;
pub mod entity;
pub mod error;
pub mod query;

pub use actions::*;
pub use entity::OrderCreate;
pub use error::*;
pub use query::OrderFilter;

use crate::catalog::Catalog;
use crate::clients::OrderClient;
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;
use chrono::Utc;
use std::sync::Arc;

/// Creates a new Order actor and its client.
///
/// The actor is not running yet: seed it with
/// [`ResourceActor::with_entities`], subscribe to its events, then spawn
/// [`ResourceActor::run`].
pub fn new(buffer_size: usize, catalog: Arc<Catalog>) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, order_id_generator());
    let client = OrderClient::new(generic_client, catalog);

    (actor, client)
}

/// Produces `order-<unix millis>` ids that strictly increase, even when two
/// orders land in the same millisecond.
pub fn order_id_generator() -> impl FnMut() -> OrderId + Send + 'static {
    let mut last = 0i64;
    move || {
        last = Utc::now().timestamp_millis().max(last + 1);
        OrderId::new(format!("order-{}", last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_increasing() {
        let mut next = order_id_generator();
        let ids: Vec<i64> = (0..50)
            .map(|_| {
                next()
                    .as_str()
                    .trim_start_matches("order-")
                    .parse()
                    .unwrap()
            })
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
