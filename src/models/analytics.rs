use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

/// 经营概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_bookings: u64,
    pub total_orders: u64,
    pub revenue_cents: i64,
    pub average_party_size: f64,
    #[serde(default)]
    pub daily_revenue: Vec<DailyRevenue>,
}

/// 概览查询条件，全部可选
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    pub venue_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AnalyticsQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(venue_id) = &self.venue_id {
            pairs.push(("venueId", venue_id.clone()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
