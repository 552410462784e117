use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::job_repository::JobRepository;
use crate::db::RepositoryError;
use super::dto::{DeletedResponse, JobDetailResponse, JobListResponse, JobResponse};
use super::models::{JobFilter, JobUpdate, NewJob};

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request could not be applied as given
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Referenced row is missing
    #[error("Referential error: {0}")]
    ReferentialError(String),

    /// Job not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the admin credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Unexpected(#[source] sqlx::Error),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MalformedRequest(msg) => ServiceError::MalformedRequest(msg),
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ReferentialError(msg) => ServiceError::ReferentialError(msg),
            RepositoryError::Unexpected(e) => ServiceError::Unexpected(e),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedRequest(_) | ServiceError::ReferentialError(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            ServiceError::MalformedRequest(msg) => {
                warn!("Malformed request: {}", msg);
                ("Bad request", msg.clone())
            }
            ServiceError::ReferentialError(msg) => {
                warn!("Referential error: {}", msg);
                ("Bad request", msg.clone())
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                ("Not found", msg.clone())
            }
            ServiceError::Unauthorized(msg) => {
                warn!("Unauthorized: {}", msg);
                ("Unauthorized", msg.clone())
            }
            ServiceError::Unexpected(e) => {
                error!("Database error: {}", e);
                ("Failed to process request", "Database error occurred".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({ "message": message }),
        })
    }
}

/// Job service containing business logic
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a single job
    ///
    /// # Returns
    /// - `Ok(JobResponse)` - Job created successfully
    /// - `Err(ServiceError::ReferentialError)` - Company does not exist
    pub async fn create_job(&self, job: &NewJob) -> Result<JobResponse, ServiceError> {
        info!("Service: Creating job with title={}", job.title);

        let job_row = JobRepository::create(&self.pool, job).await?;

        info!("Service: Job created successfully with id={}", job_row.id);
        Ok(JobResponse { job: job_row })
    }

    /// Search jobs, ordered by title
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<JobListResponse, ServiceError> {
        let jobs = JobRepository::find(&self.pool, filter).await?;
        info!("Service: Job search returned {} jobs", jobs.len());
        Ok(JobListResponse { jobs })
    }

    pub async fn get_job(&self, id: i32) -> Result<JobDetailResponse, ServiceError> {
        let job = JobRepository::get(&self.pool, id).await?;
        Ok(JobDetailResponse { job })
    }

    /// Partially update a job
    ///
    /// # Returns
    /// - `Ok(JobResponse)` - Updated job
    /// - `Err(ServiceError::MalformedRequest)` - No fields supplied
    /// - `Err(ServiceError::NotFound)` - No job with that id
    pub async fn update_job(&self, id: i32, update: &JobUpdate) -> Result<JobResponse, ServiceError> {
        info!("Service: Updating job id={}", id);

        let job_row = JobRepository::update(&self.pool, id, update).await?;

        info!("Service: Job id={} updated", id);
        Ok(JobResponse { job: job_row })
    }

    pub async fn delete_job(&self, id: i32) -> Result<DeletedResponse, ServiceError> {
        info!("Service: Deleting job id={}", id);

        JobRepository::remove(&self.pool, id).await?;

        info!("Service: Job id={} deleted", id);
        Ok(DeletedResponse { deleted: id })
    }
}
