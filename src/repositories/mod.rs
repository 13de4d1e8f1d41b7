mod attendance_repo;
mod employee_repo;
mod stats_repo;

pub use attendance_repo::AttendanceRepository;
pub use employee_repo::EmployeeRepository;
pub use stats_repo::StatsRepository;

/// A write rejected by a store-level constraint.
#[derive(Debug)]
enum ConstraintViolation {
    /// Carries the driver message, which names the offending columns.
    Unique(String),
    ForeignKey,
}

fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };

    if db_err.is_unique_violation() {
        Some(ConstraintViolation::Unique(db_err.message().to_string()))
    } else if db_err.is_foreign_key_violation() {
        Some(ConstraintViolation::ForeignKey)
    } else {
        None
    }
}
