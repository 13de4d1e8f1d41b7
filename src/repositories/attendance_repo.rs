use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{ConstraintViolation, constraint_violation};
use crate::{
    error::AppError,
    model::attendance::{Attendance, NewAttendance},
};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records one day for one employee.
    ///
    /// Fails with `NotFound` when the employee is unknown and with a duplicate
    /// error when that employee already has a row for the date. The FK and the
    /// `uq_employee_date` constraint back both checks at insert time.
    #[instrument(skip(self, input), fields(employee_id = %input.employee_id(), date = %input.date()))]
    pub async fn create(&self, input: &NewAttendance) -> Result<Attendance, AppError> {
        let employee_exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM employees WHERE id = ?")
            .bind(input.employee_id())
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if !employee_exists {
            return Err(AppError::employee_not_found());
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(input.employee_id())
        .bind(input.date())
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Err(AppError::duplicate_attendance(input.date()));
        }

        let attendance = Attendance {
            id: Uuid::new_v4(),
            employee_id: input.employee_id(),
            date: input.date(),
            status: input.status(),
        };

        sqlx::query(
            r#"
            INSERT INTO attendance (id, employee_id, date, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(attendance.id)
        .bind(attendance.employee_id)
        .bind(attendance.date)
        .bind(attendance.status)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, &attendance))?;

        info!(id = %attendance.id, status = %attendance.status, "Attendance recorded");
        Ok(attendance)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Attendance>, AppError> {
        let attendance = sqlx::query_as::<_, Attendance>(
            "SELECT id, employee_id, date, status FROM attendance WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// One employee's history, most recent first.
    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, employee_id, date, status
            FROM attendance
            WHERE employee_id = ?
            ORDER BY date DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(employee_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_all(&self, offset: u32, limit: u32) -> Result<Vec<Attendance>, AppError> {
        debug!(offset, limit, "Fetching attendance");

        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, employee_id, date, status
            FROM attendance
            ORDER BY date DESC, rowid
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, employee_id, date, status
            FROM attendance
            WHERE date = ?
            ORDER BY rowid
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Rows dated within `[start, end]`, most recent first. An inverted range is empty.
    pub async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, employee_id, date, status
            FROM attendance
            WHERE date >= ? AND date <= ?
            ORDER BY date DESC, rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// The FK and `uq_employee_date` violations map to the errors the lookups give.
fn insert_error(err: sqlx::Error, attendance: &Attendance) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(msg)) if msg.contains("attendance.date") => {
            AppError::duplicate_attendance(attendance.date)
        }
        Some(ConstraintViolation::ForeignKey) => AppError::employee_not_found(),
        _ => AppError::Storage(err),
    }
}
