use actix_web::{
    HttpResponse, delete, get, patch, post,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::{Json, Query};

use crate::api::auth::RequireAdmin;
use super::models::{JobFilter, JobUpdate, NewJob};
use super::service::{JobService, ServiceError};

#[post("")]
async fn create_job(
    _admin: RequireAdmin,
    service: Data<JobService>,
    job: Json<NewJob>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.create_job(&job).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    filter: Query<JobFilter>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.list_jobs(&filter).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{id}")]
async fn update_job(
    _admin: RequireAdmin,
    service: Data<JobService>,
    path: Path<i32>,
    update: Json<JobUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.update_job(path.into_inner(), &update).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
async fn delete_job(
    _admin: RequireAdmin,
    service: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.delete_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(create_job)
            .service(list_jobs)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
