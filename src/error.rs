use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::validation::FieldError;

/// Which uniqueness rule a rejected write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    EmployeeId,
    Email,
    Attendance,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation Error")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Duplicate { kind: DuplicateKind, message: String },
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    pub fn employee_not_found() -> Self {
        Self::NotFound("Employee not found".to_string())
    }

    pub fn duplicate_employee_id(employee_id: &str) -> Self {
        Self::Duplicate {
            kind: DuplicateKind::EmployeeId,
            message: format!("Employee with ID '{employee_id}' already exists"),
        }
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::Duplicate {
            kind: DuplicateKind::Email,
            message: format!("Employee with email '{email}' already exists"),
        }
    }

    pub fn duplicate_attendance(date: NaiveDate) -> Self {
        Self::Duplicate {
            kind: DuplicateKind::Attendance,
            message: format!("Attendance for employee on {date} already exists"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        match self {
            AppError::Validation(errors) => res.json(json!({
                "detail": "Validation Error",
                "errors": errors
            })),
            AppError::Storage(e) => {
                error!(error = %e, "Database error");
                res.json(json!({
                    "detail": "Database error occurred",
                    "message": "An error occurred while processing your request. Please try again."
                }))
            }
            AppError::Duplicate { kind, message } => {
                debug!(?kind, "Rejected duplicate");
                res.json(json!({ "detail": message }))
            }
            AppError::NotFound(message) => res.json(json!({ "detail": message })),
        }
    }
}

// Extractor failures share the validation response shape.

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError::new("body", err.to_string(), "value_error.body")]).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError::new("path", err.to_string(), "value_error.path")]).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError::new("query", err.to_string(), "value_error.query")]).into()
}
