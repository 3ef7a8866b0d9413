use super::common::ListQuery;
use super::{ApiClient, ApiError};
use crate::models::{Booking, CreateBookingRequest};

/// 预订接口
pub struct BookingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BookingApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Booking>, ApiError> {
        self.client.get(&["bookings"], &query.to_query_pairs()).await
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.client.get(&["bookings", booking_id], &[]).await
    }

    pub async fn create(&self, req: &CreateBookingRequest) -> Result<Booking, ApiError> {
        self.client.post(&["bookings"], req).await
    }

    /// 取消预订，返回更新后的记录
    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.client
            .post(&["bookings", booking_id, "cancel"], &serde_json::json!({}))
            .await
    }
}
