pub mod attendance;
pub mod employee;
pub mod health;

use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// `skip`/`limit` query parameters shared by the list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of records to skip
    #[serde(default)]
    #[param(example = 0)]
    pub skip: u32,
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    #[param(example = 100)]
    pub limit: u32,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_web::web::{self, Data};
    use chrono::NaiveDate;
    use sqlx::SqlitePool;

    use crate::{
        clock::{Clock, FixedClock},
        config::Config,
        repositories::{AttendanceRepository, EmployeeRepository, StatsRepository},
        routes,
    };

    /// Registers the same state and routes as `main`, over the given pool and a fixed date.
    pub fn configure(cfg: &mut web::ServiceConfig, pool: SqlitePool, today: NaiveDate) {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(today));
        let config = Config::for_tests();

        cfg.app_data(Data::new(EmployeeRepository::new(pool.clone())))
            .app_data(Data::new(AttendanceRepository::new(pool.clone())))
            .app_data(Data::new(StatsRepository::new(pool, clock.clone())))
            .app_data(Data::from(clock))
            .app_data(Data::new(config.clone()));
        routes::configure(cfg, &config);
    }
}
