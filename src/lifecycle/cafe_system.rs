use crate::assistant::Assistant;
use crate::catalog::Catalog;
use crate::clients::OrderClient;
use crate::config::CafeConfig;
use crate::model::{Order, SystemSettings};
use crate::notification::{spawn_status_feed, ChatEntry};
use crate::persistence::{spawn_snapshot_writer, SnapshotGateway, SnapshotStore};
use crate::session::ConversationSession;
use actor_framework::Subscribers;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator for the order pipeline.
///
/// `CafeSystem` is responsible for:
/// - **Startup**: restoring the snapshot and seeding the order actor with it
/// - **Wiring**: subscribing the snapshot writer to the order actor's change
///   events, and the status feed once someone takes it
/// - **Shutdown**: stopping the actor and waiting until every change is saved
///
/// # Example
///
/// ```ignore
/// let mut system = CafeSystem::start(&config, Arc::new(FileSnapshotStore::new(path))).await;
/// let mut feed = system.take_status_feed().unwrap();
/// let mut session = system.new_session(assistant);
///
/// let reply = session.handle_user_message("Two espressos, please").await;
///
/// drop(session);
/// system.shutdown().await?;
/// ```
pub struct CafeSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    pub catalog: Arc<Catalog>,

    /// Settings restored from the snapshot
    pub settings: SystemSettings,

    assistant_timeout: Duration,
    events: Subscribers<Order>,
    actor_handle: JoinHandle<()>,
    writer_handle: JoinHandle<crate::model::AppStore>,
    feed_handle: Option<JoinHandle<()>>,
}

impl CafeSystem {
    /// Loads the snapshot from `snapshots` and starts every task.
    pub async fn start(config: &CafeConfig, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self::start_with_catalog(config, snapshots, Catalog::default()).await
    }

    pub async fn start_with_catalog(
        config: &CafeConfig,
        snapshots: Arc<dyn SnapshotStore>,
        catalog: Catalog,
    ) -> Self {
        let gateway = SnapshotGateway::new(snapshots);
        let store = gateway.load_snapshot().await;
        let catalog = Arc::new(catalog);

        // 1. Create the actor and seed it with the restored orders
        let (order_actor, order_client) = crate::order_actor::new(config.actor_buffer, catalog.clone());
        let mut order_actor = order_actor.with_entities(
            store
                .orders
                .iter()
                .cloned()
                .map(|order| (order.id.clone(), order)),
        );

        // 2. The writer subscribes before the actor runs so no change is missed
        let writer_events = order_actor.subscribe();
        let events = order_actor.subscribers();

        let settings = store.system_settings.clone();
        let writer_handle = spawn_snapshot_writer(gateway, store, writer_events);
        let actor_handle = tokio::spawn(order_actor.run(()));

        info!(cafe = %settings.cafe_name, "Cafe system started");

        Self {
            order_client,
            catalog,
            settings,
            assistant_timeout: config.assistant.timeout(),
            events,
            actor_handle,
            writer_handle,
            feed_handle: None,
        }
    }

    /// SYSTEM status entries, one per created or transitioned order.
    ///
    /// The feed starts here: only changes committed after this call are
    /// reported, and nothing is queued while no one listens. Can be taken once.
    pub fn take_status_feed(&mut self) -> Option<mpsc::UnboundedReceiver<ChatEntry>> {
        if self.feed_handle.is_some() {
            return None;
        }
        let (entry_tx, entry_rx) = mpsc::unbounded_channel();
        self.feed_handle = Some(spawn_status_feed(self.events.subscribe(), entry_tx));
        Some(entry_rx)
    }

    /// Opens a new customer conversation greeted with the configured welcome message.
    pub fn new_session(&self, assistant: Arc<dyn Assistant>) -> ConversationSession {
        ConversationSession::new(
            assistant,
            self.order_client.clone(),
            self.assistant_timeout,
            self.settings.welcome_message.clone(),
        )
    }

    /// Gracefully shuts down the system.
    ///
    /// Sessions and other `OrderClient` clones must be dropped first; the
    /// actor only stops once its last client is gone. Returns after the
    /// snapshot writer has saved every pending change.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Closing the last client ends the actor, which closes every event stream.
        drop(self.order_client);

        if let Err(e) = self.actor_handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }
        match self.writer_handle.await {
            Ok(store) => info!(orders = store.orders.len(), "Final snapshot written"),
            Err(e) => {
                error!("Snapshot writer failed: {:?}", e);
                return Err(format!("Snapshot writer failed: {:?}", e));
            }
        }
        if let Some(feed_handle) = self.feed_handle {
            if let Err(e) = feed_handle.await {
                error!("Status feed failed: {:?}", e);
                return Err(format!("Status feed failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
