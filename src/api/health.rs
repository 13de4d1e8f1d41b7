use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::config::Config;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "HRMS Lite API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/api/docs/index.html"
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "healthy",
            "environment": "development"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "environment": config.environment
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        App,
        test::{self, TestRequest},
    };
    use serde_json::Value;

    use crate::{api::test_support, db::init_test_db};

    #[actix_web::test]
    async fn health_reports_environment() {
        let pool = init_test_db().await;
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let app = test::init_service(
            App::new().configure(|cfg| test_support::configure(cfg, pool.clone(), today)),
        )
        .await;

        let body: Value =
            test::call_and_read_body_json(&app, TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "development");

        let body: Value =
            test::call_and_read_body_json(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body["message"], "HRMS Lite API");
    }
}
