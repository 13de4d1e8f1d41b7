use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    api::{DEFAULT_LIMIT, Pagination},
    clock::Clock,
    error::AppError,
    model::attendance::AttendanceCreate,
    repositories::{AttendanceRepository, StatsRepository},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Number of records to skip (plain listing only)
    pub skip: Option<u32>,
    /// Maximum number of records to return (plain listing only)
    pub limit: Option<u32>,
    /// Exact date; takes precedence over the range
    pub date_filter: Option<NaiveDate>,
    /// Range start, inclusive; used only together with `end_date`
    pub start_date: Option<NaiveDate>,
    /// Range end, inclusive; used only together with `start_date`
    pub end_date: Option<NaiveDate>,
}

/// Which listing an attendance query selects.
#[derive(Debug, PartialEq)]
enum AttendanceFilter {
    Date(NaiveDate),
    Range(NaiveDate, NaiveDate),
    Page { skip: u32, limit: u32 },
}

impl AttendanceQuery {
    fn filter(&self) -> AttendanceFilter {
        match (self.date_filter, self.start_date, self.end_date) {
            (Some(date), _, _) => AttendanceFilter::Date(date),
            (None, Some(start), Some(end)) => AttendanceFilter::Range(start, end),
            _ => AttendanceFilter::Page {
                skip: self.skip.unwrap_or(0),
                limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            },
        }
    }
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceCreate,
    responses(
        (status = 201, description = "Attendance recorded", body = crate::model::attendance::Attendance),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        })),
        (status = 409, description = "Attendance already recorded for that date", body = Object, example = json!({
            "detail": "Attendance for employee on 2024-01-01 already exists"
        })),
        (status = 422, description = "Validation error, e.g. a future date", body = Object)
    ),
    tag = "Attendance"
)]
#[instrument(name = "create_attendance", skip(repo, clock, payload))]
pub async fn create_attendance(
    repo: web::Data<AttendanceRepository>,
    clock: web::Data<dyn Clock>,
    payload: web::Json<AttendanceCreate>,
) -> Result<HttpResponse, AppError> {
    let input = payload.into_inner().into_validated(clock.today())?;
    let attendance = repo.create(&input).await?;

    Ok(HttpResponse::Created().json(attendance))
}

/// List attendance, optionally filtered by exact date or by date range
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = [crate::model::attendance::Attendance])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    repo: web::Data<AttendanceRepository>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.filter();
    debug!(?filter, "Listing attendance");

    let rows = match filter {
        AttendanceFilter::Date(date) => repo.list_by_date(date).await?,
        AttendanceFilter::Range(start, end) => repo.list_by_date_range(start, end).await?,
        AttendanceFilter::Page { skip, limit } => repo.list_all(skip, limit).await?,
    };

    Ok(HttpResponse::Ok().json(rows))
}

/// Attendance history for one employee, most recent first
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee UUID"),
        Pagination
    ),
    responses(
        (status = 200, description = "Attendance records", body = [crate::model::attendance::Attendance])
    ),
    tag = "Attendance"
)]
pub async fn list_employee_attendance(
    repo: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let rows = repo
        .list_for_employee(path.into_inner(), query.skip, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance record UUID")
    ),
    responses(
        (status = 200, description = "Attendance record", body = crate::model::attendance::Attendance),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    repo: web::Data<AttendanceRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    match repo.get(path.into_inner()).await? {
        Some(attendance) => Ok(HttpResponse::Ok().json(attendance)),
        None => Err(AppError::NotFound("Attendance record not found".to_string())),
    }
}

/// Dashboard counts for today
#[utoipa::path(
    get,
    path = "/api/attendance/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = crate::model::attendance::DashboardStats)
    ),
    tag = "Attendance"
)]
pub async fn dashboard(stats: web::Data<StatsRepository>) -> Result<HttpResponse, AppError> {
    let stats = stats.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        App,
        http::StatusCode,
        test::{self, TestRequest},
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        api::test_support,
        db::init_test_db,
        model::{
            attendance::{Attendance, DashboardStats},
            employee::Employee,
        },
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(skip: Option<u32>, date_filter: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> AttendanceQuery {
        AttendanceQuery {
            skip,
            limit: None,
            date_filter,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn exact_date_beats_range_which_beats_paging() {
        let d = date(2024, 1, 1);
        let e = date(2024, 1, 31);

        assert_eq!(query(Some(5), Some(d), Some(d), Some(e)).filter(), AttendanceFilter::Date(d));
        assert_eq!(query(Some(5), None, Some(d), Some(e)).filter(), AttendanceFilter::Range(d, e));
        assert_eq!(
            query(Some(5), None, Some(d), None).filter(),
            AttendanceFilter::Page { skip: 5, limit: DEFAULT_LIMIT }
        );
    }

    #[actix_web::test]
    async fn attendance_flow_over_http() {
        let pool = init_test_db().await;
        let app = test::init_service(
            App::new().configure(|cfg| test_support::configure(cfg, pool.clone(), date(2024, 1, 2))),
        )
        .await;

        let req = TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "employee_id": "E1",
                "full_name": "Ann Lee",
                "email": "ann@x.com",
                "department": "Eng"
            }))
            .to_request();
        let ann: Employee = test::call_and_read_body_json(&app, req).await;

        let mark = |day: &str, status: &str| {
            TestRequest::post()
                .uri("/api/attendance")
                .set_json(json!({ "employee_id": ann.id, "date": day, "status": status }))
                .to_request()
        };

        let resp = test::call_service(&app, mark("2024-01-01", "Present")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let first: Attendance = test::read_body_json(resp).await;

        let resp = test::call_service(&app, mark("2024-01-01", "Absent")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("2024-01-01"));

        let resp = test::call_service(&app, mark("2024-01-03", "Present")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "date");

        let resp = test::call_service(&app, mark("2099-01-01", "Late")).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, ["date", "status"]);

        let req = TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "employee_id": uuid::Uuid::new_v4(), "date": "2024-01-01", "status": "Present" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, mark("2024-01-02", "Absent")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = TestRequest::get().uri(&format!("/api/attendance/{}", first.id)).to_request();
        let fetched: Attendance = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, first);

        let req = TestRequest::get().uri(&format!("/api/attendance/{}", Uuid::new_v4())).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Attendance record not found");

        let req = TestRequest::get().uri("/api/attendance?date_filter=2024-01-01").to_request();
        let rows: Vec<Attendance> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rows, vec![first.clone()]);

        let req = TestRequest::get()
            .uri("/api/attendance?start_date=2024-01-01&end_date=2023-01-01")
            .to_request();
        let rows: Vec<Attendance> = test::call_and_read_body_json(&app, req).await;
        assert!(rows.is_empty());

        let req = TestRequest::get().uri(&format!("/api/attendance/employee/{}", ann.id)).to_request();
        let rows: Vec<Attendance> = test::call_and_read_body_json(&app, req).await;
        let dates: Vec<_> = rows.iter().map(|a| a.date).collect();
        assert_eq!(dates, [date(2024, 1, 2), date(2024, 1, 1)]);

        let req = TestRequest::get().uri("/api/attendance/dashboard").to_request();
        let stats: DashboardStats = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            stats,
            DashboardStats {
                total_employees: 1,
                total_attendance_records: 2,
                present_today: 0,
                absent_today: 1,
            }
        );
    }
}
