use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use crate::{clock::Clock, error::AppError, model::attendance::DashboardStats};

/// Read-only aggregate counts over both tables.
#[derive(Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Counts computed on every call; "today" is read from the clock at call time.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let today = self.clock.today();
        debug!(%today, "Computing dashboard stats");

        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees) AS total_employees,
                (SELECT COUNT(*) FROM attendance) AS total_attendance_records,
                (SELECT COUNT(*) FROM attendance
                    WHERE date = ? AND status = 'Present') AS present_today,
                (SELECT COUNT(*) FROM attendance
                    WHERE date = ? AND status = 'Absent') AS absent_today
            "#,
        )
        .bind(today)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
