use crate::model::attendance::{Attendance, AttendanceCreate, AttendanceStatus, DashboardStats};
use crate::model::employee::{Employee, EmployeeCreate, EmployeeWithStats};
use crate::validation::FieldError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System, lightweight edition

Tracks employees and their daily attendance.

- **Employees**: create, list (optionally with present-day totals), view, delete.
  Deleting an employee deletes their attendance history.
- **Attendance**: one `Present`/`Absent` record per employee per day, never in
  the future. List by date, by date range, or per employee.
- **Dashboard**: headcount, record count and today's present/absent totals.

### Errors
- `422` validation errors carry an `errors` list of `{field, message, type}`.
- `404` / `409` carry a `detail` message.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::list_employees_with_stats,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_employee_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::dashboard,

        crate::api::health::health
    ),
    components(
        schemas(
            Employee,
            EmployeeCreate,
            EmployeeWithStats,
            Attendance,
            AttendanceCreate,
            AttendanceStatus,
            DashboardStats,
            FieldError
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/employees",
            "/api/employees/with-stats",
            "/api/employees/{id}",
            "/api/attendance",
            "/api/attendance/dashboard",
            "/api/attendance/employee/{employee_id}",
            "/api/attendance/{id}",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
