use super::{ApiClient, ApiError};
use crate::models::{AnalyticsQuery, AnalyticsSummary};

pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self, query: &AnalyticsQuery) -> Result<AnalyticsSummary, ApiError> {
        self.client
            .get(&["analytics", "summary"], &query.to_query_pairs())
            .await
    }
}
