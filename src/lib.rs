use actix_web::web;
use sqlx::{Pool, Postgres};

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod shutdown;

use crate::api::{
    health::health_config,
    job::{handlers::job_config, JobService},
    state::AppState,
    validation,
};

/// Register shared state, extractor configs and all routes.
///
/// Used by the server for every worker and by the integration tests.
pub fn configure_app(
    pool: Pool<Postgres>,
    state: AppState,
    max_payload_size: usize,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(JobService::new(pool.clone())))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config(max_payload_size))
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config);
    }
}
