use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Schema statements, applied in order and safe to re-run.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BLOB PRIMARY KEY NOT NULL,
        employee_id TEXT NOT NULL,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL,
        department TEXT NOT NULL,
        CONSTRAINT uq_employee_external_id UNIQUE (employee_id),
        CONSTRAINT uq_employee_email UNIQUE (email)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_employee_name ON employees(full_name)",
    "CREATE INDEX IF NOT EXISTS idx_employee_dept ON employees(department)",
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id BLOB PRIMARY KEY NOT NULL,
        employee_id BLOB NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
        CONSTRAINT uq_employee_date UNIQUE (employee_id, date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_status ON attendance(status)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_employee_date ON attendance(employee_id, date)",
];

pub async fn init_db(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    setup_schema(&pool).await?;

    info!("Database schema ready");
    Ok(pool)
}

async fn setup_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Isolated in-memory store; a single connection keeps the database alive.
#[cfg(test)]
pub async fn init_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<std::time::Duration>)
        .max_lifetime(None::<std::time::Duration>)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    setup_schema(&pool).await.expect("Failed to apply schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn schema_can_be_applied_twice() {
        let pool = init_test_db().await;
        setup_schema(&pool).await.expect("schema should be idempotent");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, ["attendance", "employees"]);
    }

    #[actix_web::test]
    async fn foreign_keys_are_enforced() {
        let pool = init_test_db().await;
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
