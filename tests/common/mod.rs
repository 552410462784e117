#![allow(dead_code)]

use actix_web::web::ServiceConfig;
use job_board::api::state::AppState;
use sqlx::PgPool;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Route and state wiring identical to the server's, with a known admin token.
pub fn app_config(pool: PgPool) -> impl Fn(&mut ServiceConfig) + Clone {
    job_board::configure_app(pool, AppState::new("job-board-test", Some(ADMIN_TOKEN.into())), 1024 * 1024)
}

pub fn admin_auth() -> (&'static str, String) {
    ("Authorization", format!("Bearer {ADMIN_TOKEN}"))
}

pub fn user_auth() -> (&'static str, &'static str) {
    ("Authorization", "Bearer not-the-admin")
}
