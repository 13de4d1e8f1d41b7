use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{ConstraintViolation, constraint_violation};
use crate::{
    error::AppError,
    model::employee::{Employee, EmployeeWithStats, NewEmployee},
};

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a new employee after checking `employee_id` and `email` are free.
    ///
    /// The lookups only produce the friendly error; the unique constraints on the
    /// table decide, so a concurrent insert that wins the race still surfaces as
    /// the matching duplicate error.
    #[instrument(skip(self, input), fields(employee_id = %input.employee_id()))]
    pub async fn create(&self, input: &NewEmployee) -> Result<Employee, AppError> {
        if self.get_by_external_id(input.employee_id()).await?.is_some() {
            return Err(AppError::duplicate_employee_id(input.employee_id()));
        }
        if self.get_by_email(input.email()).await?.is_some() {
            return Err(AppError::duplicate_email(input.email()));
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            employee_id: input.employee_id().to_string(),
            full_name: input.full_name().to_string(),
            email: input.email().to_string(),
            department: input.department().to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO employees (id, employee_id, full_name, email, department)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.id)
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.department)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, &employee))?;

        info!(id = %employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn get_by_external_id(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department
            FROM employees
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department
            FROM employees
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Employees in insertion order.
    pub async fn list(&self, offset: u32, limit: u32) -> Result<Vec<Employee>, AppError> {
        debug!(offset, limit, "Fetching employees");

        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department
            FROM employees
            ORDER BY rowid
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Removes the employee; its attendance rows go with it through the FK cascade.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let attendance_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE employee_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::employee_not_found());
        }

        tx.commit().await?;

        info!(attendance_rows, "Employee deleted");
        Ok(())
    }

    /// Every employee with the number of days marked `Present`, in insertion order.
    pub async fn list_with_stats(&self) -> Result<Vec<EmployeeWithStats>, AppError> {
        let rows = sqlx::query_as::<_, EmployeeWithStats>(
            r#"
            SELECT
                e.id,
                e.employee_id,
                e.full_name,
                e.email,
                e.department,
                COUNT(a.id) AS total_present_days
            FROM employees e
            LEFT JOIN attendance a
                ON a.employee_id = e.id AND a.status = 'Present'
            GROUP BY e.id
            ORDER BY e.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Names the duplicate by the unique constraint the store reports.
fn insert_error(err: sqlx::Error, employee: &Employee) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(msg)) if msg.contains("employees.employee_id") => {
            AppError::duplicate_employee_id(&employee.employee_id)
        }
        Some(ConstraintViolation::Unique(msg)) if msg.contains("employees.email") => {
            AppError::duplicate_email(&employee.email)
        }
        _ => AppError::Storage(err),
    }
}
