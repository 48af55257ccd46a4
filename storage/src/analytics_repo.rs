//! Analytics repository: response-time / satisfaction rows and their per-user aggregate.

use tracing::info;

use crate::error::StorageError;
use crate::models::{AnalyticsMetrics, AnalyticsRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool_manager: SqlitePoolManager,
}

impl AnalyticsRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn record(&self, record: &AnalyticsRecord) -> Result<(), StorageError> {
        if let Some(score) = record.satisfaction_score {
            if !(1..=5).contains(&score) {
                return Err(StorageError::Invalid(format!(
                    "satisfaction_score {} (expected 1-5)",
                    score
                )));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO analytics (id, user_id, conversation_id, response_time_ms, satisfaction_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.conversation_id)
        .bind(record.response_time_ms)
        .bind(record.satisfaction_score)
        .bind(record.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(
            user_id = %record.user_id,
            conversation_id = %record.conversation_id,
            response_time_ms = ?record.response_time_ms,
            "Recorded analytics"
        );
        Ok(())
    }

    /// Rows of `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalyticsRecord>, StorageError> {
        let rows = sqlx::query_as::<_, AnalyticsRecord>(
            "SELECT * FROM analytics WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows)
    }

    pub async fn metrics(&self, user_id: &str) -> Result<AnalyticsMetrics, StorageError> {
        let (total_responses, total_conversations, avg_response, avg_satisfaction): (
            i64,
            i64,
            Option<f64>,
            Option<f64>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT conversation_id), AVG(response_time_ms), AVG(satisfaction_score)
            FROM analytics WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool_manager.pool())
        .await?;

        Ok(AnalyticsMetrics {
            total_responses,
            total_conversations,
            average_response_time_ms: avg_response.map(|v| v.round() as i64).unwrap_or(0),
            average_satisfaction: avg_satisfaction.map(|v| v.round() as i64).unwrap_or(0),
        })
    }
}
