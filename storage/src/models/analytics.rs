//! Analytics rows (one per answered turn) and the per-user aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyticsRecord {
    pub id: String,
    pub user_id: String,
    pub conversation_id: String,
    pub response_time_ms: Option<i64>,
    pub satisfaction_score: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsRecord {
    pub fn new(
        user_id: &str,
        conversation_id: &str,
        response_time_ms: Option<i64>,
        satisfaction_score: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            conversation_id: conversation_id.to_string(),
            response_time_ms,
            satisfaction_score,
            created_at: Utc::now(),
        }
    }
}

/// Dashboard metrics. Averages skip NULL values, are rounded, and are 0 when nothing qualifies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub total_responses: i64,
    pub total_conversations: i64,
    pub average_response_time_ms: i64,
    pub average_satisfaction: i64,
}
