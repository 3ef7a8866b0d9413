use super::{ApiClient, ApiError};
use crate::models::{CreateVenueRequest, UpdateVenueRequest, Venue};

/// 场所接口
pub struct VenueApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VenueApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Venue>, ApiError> {
        self.client.get(&["venues"], &[]).await
    }

    pub async fn get(&self, venue_id: &str) -> Result<Venue, ApiError> {
        self.client.get(&["venues", venue_id], &[]).await
    }

    pub async fn create(&self, req: &CreateVenueRequest) -> Result<Venue, ApiError> {
        self.client.post(&["venues"], req).await
    }

    pub async fn update(&self, venue_id: &str, req: &UpdateVenueRequest) -> Result<Venue, ApiError> {
        self.client.put(&["venues", venue_id], req).await
    }
}
