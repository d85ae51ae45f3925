//! Load and save the whole [`AppStore`] snapshot.
//!
//! Neither direction ever fails the caller. A missing or unreadable snapshot
//! loads as the default seed; a failed save is logged and the in-memory state
//! stays authoritative.

use super::{PersistenceError, SnapshotStore};
use crate::model::{AppStore, Order};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The only key merged one level deeper than the top level.
const SETTINGS_KEY: &str = "systemSettings";

#[derive(Clone)]
pub struct SnapshotGateway {
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotGateway {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Restores the last snapshot, back-filling anything it lacks from the seed.
    pub async fn load_snapshot(&self) -> AppStore {
        let raw = match self.store.load_raw().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No snapshot found, starting from the default seed");
                return AppStore::default();
            }
            Err(e) => {
                error!(error = %e, "Failed to read snapshot, starting from the default seed");
                return AppStore::default();
            }
        };

        match merge_snapshot(&raw) {
            Ok(store) => {
                info!(orders = store.orders.len(), "Snapshot loaded");
                store
            }
            Err(e) => {
                warn!(error = %e, "Snapshot is unreadable, starting from the default seed");
                AppStore::default()
            }
        }
    }

    /// Persists `state`. Errors are logged and swallowed.
    pub async fn save_snapshot(&self, state: &AppStore) {
        if let Err(e) = self.try_save(state).await {
            error!(error = %e, "Failed to save snapshot");
        }
    }

    async fn try_save(&self, state: &AppStore) -> Result<(), PersistenceError> {
        let data = serde_json::to_string(state)?;
        self.store.save_raw(&data).await?;
        debug!(bytes = data.len(), orders = state.orders.len(), "Snapshot saved");
        Ok(())
    }
}

/// Parses a stored snapshot and lays it over the default seed.
///
/// Top-level keys present in `raw` replace the seed's; `systemSettings` is
/// merged key by key. Nothing deeper is merged. `null` counts as absent.
/// Orders sharing an id are collapsed to the first one.
pub fn merge_snapshot(raw: &str) -> Result<AppStore, PersistenceError> {
    let Value::Object(stored) = serde_json::from_str::<Value>(raw)? else {
        return Err(PersistenceError::Serialization(
            "snapshot is not a JSON object".to_string(),
        ));
    };
    let Value::Object(mut merged) = serde_json::to_value(AppStore::default())? else {
        return Err(PersistenceError::Serialization(
            "default seed is not a JSON object".to_string(),
        ));
    };

    for (key, value) in stored {
        if value.is_null() {
            continue;
        }
        if key == SETTINGS_KEY {
            if let (Some(Value::Object(defaults)), Value::Object(settings)) =
                (merged.get_mut(SETTINGS_KEY), &value)
            {
                merge_shallow(defaults, settings);
                continue;
            }
        }
        merged.insert(key, value);
    }

    let mut store: AppStore = serde_json::from_value(Value::Object(merged))?;
    dedup_orders(&mut store.orders);
    Ok(store)
}

/// Keeps the first order for each id. Returns how many were dropped.
pub fn dedup_orders(orders: &mut Vec<Order>) -> usize {
    let before = orders.len();
    let mut seen = HashSet::new();
    orders.retain(|order| {
        let first = seen.insert(order.id.clone());
        if !first {
            warn!(order_id = %order.id, "Dropping duplicate order from snapshot");
        }
        first
    });
    before - orders.len()
}

fn merge_shallow(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if !value.is_null() {
            target.insert(key.clone(), value.clone());
        }
    }
}
