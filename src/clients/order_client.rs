use crate::catalog::Catalog;
use crate::model::{Order, OrderId, RequestedItem};
use crate::order_actor::{OrderAction, OrderCreate, OrderError, OrderFilter};
use crate::order_factory::build_order;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Pricing happens here, before anything reaches the actor; the actor only
/// ever sees validated payloads. State-machine checks run inside the actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    catalog: Arc<Catalog>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, catalog: Arc<Catalog>) -> Self {
        Self { inner, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Customer path: prices the items and stores a `Pending` order.
    #[instrument(skip(self, items))]
    pub async fn place_order(&self, items: &[RequestedItem]) -> Result<Order, OrderError> {
        debug!(?items, "place_order called");
        let payload = build_order(&self.catalog, items)?;
        let id = self
            .inner
            .create(OrderCreate::pending(payload))
            .await
            .map_err(Self::map_error)?;
        info!(%id, "Order placed");
        self.fetch(id).await
    }

    /// Staff path: prices the items and stores an already `Approved` order.
    #[instrument(skip(self, items))]
    pub async fn create_manual(
        &self,
        items: &[RequestedItem],
        tracking_number: &str,
    ) -> Result<Order, OrderError> {
        debug!(?items, "create_manual called");
        let payload = build_order(&self.catalog, items)?;
        let id = self
            .inner
            .create(OrderCreate::approved(payload, tracking_number))
            .await
            .map_err(Self::map_error)?;
        info!(%id, "Manual order created");
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: &OrderId, tracking_number: &str) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(
                id.clone(),
                OrderAction::Approve {
                    tracking_number: tracking_number.to_string(),
                },
            )
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, id: &OrderId) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id.clone(), OrderAction::Reject)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn query(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        Ok(filter.apply(self.list().await?))
    }

    async fn fetch(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or(OrderError::NotFound(id))
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(order_error) => order_error,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(OrderId::from(id)),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
