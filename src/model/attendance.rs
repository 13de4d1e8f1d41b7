use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{FieldError, require_not_future, require_present},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    Display,
    EnumString,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 1280)]
    pub total_attendance_records: i64,
    #[schema(example = 37)]
    pub present_today: i64,
    #[schema(example = 3)]
    pub absent_today: i64,
}

/// Mark-attendance payload as received on the wire.
///
/// Values arrive as strings and are parsed in [`AttendanceCreate::into_validated`],
/// so every bad field shows up in one response.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AttendanceCreate {
    #[schema(value_type = String, format = "uuid", example = "5d0c5a4e-2f7b-4a8e-9d3c-1b2a3c4d5e6f")]
    pub employee_id: Option<String>,
    #[schema(value_type = String, example = "2024-01-01", format = "date")]
    pub date: Option<String>,
    #[schema(value_type = AttendanceStatus)]
    pub status: Option<String>,
}

impl AttendanceCreate {
    #[cfg(test)]
    pub fn new(employee_id: Uuid, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            date: Some(date.to_string()),
            status: Some(status.to_string()),
        }
    }

    /// Parses each field and rejects dates later than `today`.
    pub fn into_validated(self, today: NaiveDate) -> Result<NewAttendance, AppError> {
        let mut errors = Vec::new();

        let employee_id = require_present("employee_id", self.employee_id, &mut errors).and_then(|raw| {
            Uuid::parse_str(raw.trim())
                .map_err(|_| {
                    errors.push(FieldError::new("employee_id", "value is not a valid uuid", "type_error.uuid"))
                })
                .ok()
        });

        let date = require_present("date", self.date, &mut errors).and_then(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| {
                    errors.push(FieldError::new(
                        "date",
                        "invalid date format, expected YYYY-MM-DD",
                        "value_error.date",
                    ))
                })
                .ok()
        });
        if let Some(date) = date {
            require_not_future("date", date, today, &mut errors);
        }

        let status = require_present("status", self.status, &mut errors).and_then(|raw| {
            AttendanceStatus::from_str(&raw)
                .map_err(|_| {
                    errors.push(FieldError::new(
                        "status",
                        "value is not a valid enumeration member; permitted: 'Present', 'Absent'",
                        "type_error.enum",
                    ))
                })
                .ok()
        });

        match (employee_id, date, status) {
            (Some(employee_id), Some(date), Some(status)) if errors.is_empty() => Ok(NewAttendance {
                employee_id,
                date,
                status,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewAttendance {
    employee_id: Uuid,
    date: NaiveDate,
    status: AttendanceStatus,
}

impl NewAttendance {
    pub fn employee_id(&self) -> Uuid {
        self.employee_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }
}
