use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "value is not a valid email address")]
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "value_error.email")]
    pub kind: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: kind.into(),
        }
    }
}

/// Flattens `validator` output into field errors, sorted by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}")),
                kind: e.code.to_string(),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Unwraps an optional payload field, recording it as missing when absent.
pub fn require_present<T>(field: &str, value: Option<T>, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::new(field, "Field required", "value_error.missing"));
    }
    value
}

pub fn require_not_blank(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(
            field,
            "Field cannot be empty or whitespace",
            "value_error.blank",
        ));
    }
}

pub fn require_not_future(
    field: &str,
    value: NaiveDate,
    today: NaiveDate,
    errors: &mut Vec<FieldError>,
) {
    if value > today {
        errors.push(FieldError::new(
            field,
            "Attendance date cannot be in the future",
            "value_error.future_date",
        ));
    }
}

/// Lowercases the domain part of an address; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}
