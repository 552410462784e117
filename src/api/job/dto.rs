use serde::Serialize;
use crate::db::models::{JobDetail, JobRow};

/// Response carrying a single job
#[derive(Serialize)]
pub struct JobResponse {
    pub job: JobRow,
}

/// Response carrying a job with its company nested
#[derive(Serialize)]
pub struct JobDetailResponse {
    pub job: JobDetail,
}

/// Response for job search
#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
}

/// Response for job deletion
#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: i32,
}
