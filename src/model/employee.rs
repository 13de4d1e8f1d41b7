use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    validation::{FieldError, field_errors, normalize_email, require_not_blank, require_present},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "5d0c5a4e-2f7b-4a8e-9d3c-1b2a3c4d5e6f",
        "employee_id": "EMP-001",
        "full_name": "Ann Lee",
        "email": "ann.lee@company.com",
        "department": "Engineering"
    })
)]
pub struct Employee {
    pub id: Uuid,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Ann Lee")]
    pub full_name: String,

    #[schema(example = "ann.lee@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,
}

/// Employee row paired with the number of days it was marked `Present`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeWithStats {
    pub id: Uuid,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    #[schema(example = 12)]
    pub total_present_days: i64,
}

/// Create-employee payload as received on the wire.
///
/// Fields are optional here so that a missing field is reported alongside every
/// other failure instead of aborting deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct EmployeeCreate {
    #[validate(length(max = 50, message = "ensure this value has at most 50 characters"))]
    #[schema(value_type = String, example = "EMP-001", max_length = 50)]
    pub employee_id: Option<String>,

    #[validate(length(max = 200, message = "ensure this value has at most 200 characters"))]
    #[schema(value_type = String, example = "Ann Lee", max_length = 200)]
    pub full_name: Option<String>,

    #[validate(email(message = "value is not a valid email address"))]
    #[schema(value_type = String, example = "ann.lee@company.com", format = "email")]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "ensure this value has at most 100 characters"))]
    #[schema(value_type = String, example = "Engineering", max_length = 100)]
    pub department: Option<String>,
}

impl EmployeeCreate {
    #[cfg(test)]
    pub fn new(employee_id: &str, full_name: &str, email: &str, department: &str) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            department: Some(department.to_string()),
        }
    }

    /// Trims every field and checks it, reporting all failures at once.
    ///
    /// The email domain is lowercased so that uniqueness ignores its case.
    pub fn into_validated(self) -> Result<NewEmployee, AppError> {
        let mut errors = Vec::new();
        let trim = |field: &str, value: Option<String>, errors: &mut Vec<FieldError>| {
            require_present(field, value, errors).map(|v| v.trim().to_owned())
        };

        let trimmed = EmployeeCreate {
            employee_id: trim("employee_id", self.employee_id, &mut errors),
            full_name: trim("full_name", self.full_name, &mut errors),
            email: trim("email", self.email, &mut errors),
            department: trim("department", self.department, &mut errors),
        };

        if let Err(e) = trimmed.validate() {
            errors.extend(field_errors(&e));
        }
        for (field, value) in [
            ("employee_id", &trimmed.employee_id),
            ("full_name", &trimmed.full_name),
            ("department", &trimmed.department),
        ] {
            if let Some(value) = value {
                require_not_blank(field, value, &mut errors);
            }
        }

        match trimmed {
            EmployeeCreate {
                employee_id: Some(employee_id),
                full_name: Some(full_name),
                email: Some(email),
                department: Some(department),
            } if errors.is_empty() => Ok(NewEmployee {
                employee_id,
                full_name,
                email: normalize_email(&email),
                department,
            }),
            _ => {
                errors.sort_by(|a, b| a.field.cmp(&b.field));
                Err(AppError::Validation(errors))
            }
        }
    }
}

/// A trimmed, validated employee ready to be stored.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    employee_id: String,
    full_name: String,
    email: String,
    department: String,
}

impl NewEmployee {
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn department(&self) -> &str {
        &self.department
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(employee_id: &str, full_name: &str, email: &str, department: &str) -> EmployeeCreate {
        EmployeeCreate::new(employee_id, full_name, email, department)
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let employee = payload("  E1 ", " Ann Lee\t", " ann@x.com ", " Eng ")
            .into_validated()
            .unwrap();

        assert_eq!(employee.employee_id(), "E1");
        assert_eq!(employee.full_name(), "Ann Lee");
        assert_eq!(employee.email(), "ann@x.com");
        assert_eq!(employee.department(), "Eng");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let err = payload("   ", "", "not-an-email", " ").into_validated().unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["department", "email", "employee_id", "full_name"]);
        assert_eq!(errors[1].kind, "email");
    }

    #[test]
    fn length_limits_count_characters_after_trim() {
        let fifty = "é".repeat(50);
        assert!(payload(&format!(" {fifty} "), "Ann", "ann@x.com", "Eng").into_validated().is_ok());

        let err = payload(&"x".repeat(51), "Ann", "ann@x.com", &"d".repeat(101))
            .into_validated()
            .unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["department", "employee_id"]);
        assert!(errors.iter().all(|e| e.kind == "length"));
    }

    #[test]
    fn missing_fields_are_reported_with_the_others() {
        let partial = EmployeeCreate {
            employee_id: Some("  ".to_string()),
            email: Some("nope".to_string()),
            ..Default::default()
        };

        let AppError::Validation(errors) = partial.into_validated().unwrap_err() else {
            panic!("expected validation error");
        };
        let reported: Vec<_> = errors.iter().map(|e| (e.field.as_str(), e.kind.as_str())).collect();
        assert_eq!(
            reported,
            [
                ("department", "value_error.missing"),
                ("email", "email"),
                ("employee_id", "value_error.blank"),
                ("full_name", "value_error.missing"),
            ]
        );
    }

    #[test]
    fn email_domain_is_stored_lowercase() {
        let employee = payload("E1", "Ann", " Ann@Company.COM ", "Eng").into_validated().unwrap();
        assert_eq!(employee.email(), "Ann@company.com");
    }
}
