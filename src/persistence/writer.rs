//! Background task that keeps the snapshot in step with the order actor.

use super::SnapshotGateway;
use crate::model::{AppStore, Order};
use actor_framework::ResourceEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Applies one committed order change to the mirrored store.
pub fn apply_event(store: &mut AppStore, event: ResourceEvent<Order>) {
    match event {
        ResourceEvent::Created { id, entity } | ResourceEvent::Updated { id, entity } => {
            match store.orders.iter_mut().find(|o| o.id == id) {
                Some(existing) => *existing = entity,
                None => store.orders.push(entity),
            }
        }
        ResourceEvent::Deleted { id } => store.orders.retain(|o| o.id != id),
    }
}

/// Saves the whole store after every order change, in commit order.
///
/// `mirror` must hold the same orders the actor was seeded with. The task
/// ends once the actor has shut down and every queued event has been written,
/// and returns the final state.
pub fn spawn_snapshot_writer(
    gateway: SnapshotGateway,
    mut mirror: AppStore,
    mut events: mpsc::UnboundedReceiver<ResourceEvent<Order>>,
) -> JoinHandle<AppStore> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(order_id = %event.id(), "Persisting order change");
            apply_event(&mut mirror, event);
            gateway.save_snapshot(&mirror).await;
        }
        info!(orders = mirror.orders.len(), "Snapshot writer stopped");
        mirror
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            lines: Vec::new(),
            total: Decimal::ZERO,
            status,
            created_at: Utc::now(),
            tracking_number: None,
        }
    }

    #[test]
    fn updates_replace_in_place() {
        let mut store = AppStore::default();
        for id in ["a", "b"] {
            apply_event(
                &mut store,
                ResourceEvent::Created {
                    id: OrderId::new(id),
                    entity: order(id, OrderStatus::Pending),
                },
            );
        }
        apply_event(
            &mut store,
            ResourceEvent::Updated {
                id: OrderId::new("a"),
                entity: order("a", OrderStatus::Rejected),
            },
        );

        assert_eq!(store.orders.len(), 2);
        assert_eq!(store.orders[0].status, OrderStatus::Rejected);
        assert_eq!(store.orders[1].id.as_str(), "b");

        apply_event(&mut store, ResourceEvent::Deleted { id: OrderId::new("a") });
        assert_eq!(store.orders.len(), 1);
    }
}
