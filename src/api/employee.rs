use actix_web::{HttpResponse, web};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    api::Pagination,
    error::AppError,
    model::employee::EmployeeCreate,
    repositories::EmployeeRepository,
};

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeCreate,
    responses(
        (status = 201, description = "Employee created", body = crate::model::employee::Employee),
        (status = 409, description = "employee_id or email already in use", body = Object, example = json!({
            "detail": "Employee with ID 'EMP-001' already exists"
        })),
        (status = 422, description = "Validation error", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "create_employee", skip(repo, payload))]
pub async fn create_employee(
    repo: web::Data<EmployeeRepository>,
    payload: web::Json<EmployeeCreate>,
) -> Result<HttpResponse, AppError> {
    let input = payload.into_inner().into_validated()?;
    let employee = repo.create(&input).await?;

    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(Pagination),
    responses(
        (status = 200, description = "Employees in storage order", body = [crate::model::employee::Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    repo: web::Data<EmployeeRepository>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let employees = repo.list(query.skip, query.limit).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Every employee with their total present days
#[utoipa::path(
    get,
    path = "/api/employees/with-stats",
    responses(
        (status = 200, description = "Employees with present-day counts", body = [crate::model::employee::EmployeeWithStats])
    ),
    tag = "Employee"
)]
pub async fn list_employees_with_stats(
    repo: web::Data<EmployeeRepository>,
) -> Result<HttpResponse, AppError> {
    let employees = repo.list_with_stats().await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee UUID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::employee::Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match repo.get(id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::employee_not_found()),
    }
}

/// Delete Employee and all of their attendance
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee UUID")
    ),
    responses(
        (status = 204, description = "Employee and attendance history removed"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "delete_employee", skip(repo))]
pub async fn delete_employee(
    repo: web::Data<EmployeeRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    repo.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
