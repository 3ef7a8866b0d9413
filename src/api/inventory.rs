use super::common::ListQuery;
use super::{ApiClient, ApiError};
use crate::models::{AdjustInventoryRequest, InventoryItem};

pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<InventoryItem>, ApiError> {
        self.client.get(&["inventory"], &query.to_query_pairs()).await
    }

    pub async fn adjust(&self, item_id: &str, req: &AdjustInventoryRequest) -> Result<InventoryItem, ApiError> {
        self.client.patch(&["inventory", item_id], req).await
    }
}
