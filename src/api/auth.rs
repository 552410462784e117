use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web::Data, FromRequest, HttpRequest};

use crate::api::job::ServiceError;
use crate::api::state::AppState;

/// Requires `Authorization: Bearer <admin token>`. Rejects with 401 otherwise.
///
/// With no admin token configured every request is rejected.
#[derive(Debug)]
pub struct RequireAdmin;

impl FromRequest for RequireAdmin {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<RequireAdmin, ServiceError> {
    let expected = req
        .app_data::<Data<AppState>>()
        .and_then(|state| state.admin_token().map(str::to_owned))
        .ok_or_else(|| ServiceError::Unauthorized("Admin access is disabled".to_string()))?;

    let supplied = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match supplied {
        Some(token) if token == expected => Ok(RequireAdmin),
        Some(_) => Err(ServiceError::Unauthorized("Invalid admin token".to_string())),
        None => Err(ServiceError::Unauthorized("Admin token required".to_string())),
    }
}
