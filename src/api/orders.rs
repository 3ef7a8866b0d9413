use super::common::ListQuery;
use super::{ApiClient, ApiError};
use crate::models::{CreateOrderRequest, Order, OrderStatus, UpdateOrderStatusRequest};

/// 订单接口
pub struct OrderApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrderApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Order>, ApiError> {
        self.client.get(&["orders"], &query.to_query_pairs()).await
    }

    pub async fn create(&self, req: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.client.post(&["orders"], req).await
    }

    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        self.client
            .patch(
                &["orders", order_id, "status"],
                &UpdateOrderStatusRequest { status },
            )
            .await
    }
}
