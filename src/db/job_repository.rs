use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::job::{JobFilter, JobUpdate, NewJob};
use crate::db::company_repository::CompanyRepository;
use crate::db::error::RepositoryError;
use crate::db::models::{JobDetail, JobRow};
use crate::db::sql::{bind_values, build_set_clause, build_where_clause, where_keyword, JOB_FIELDS};

/// Columns returned for every job row, foreign key included.
const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// Insert a job and return it as stored
    pub async fn create(pool: &Pool<Postgres>, job: &NewJob) -> Result<JobRow, RepositoryError> {
        debug!("Creating job: title={}, company={}", job.title, job.company_handle);

        let query = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(&job.title)
            .bind(job.salary)
            .bind(job.equity)
            .bind(&job.company_handle)
            .fetch_one(pool)
            .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// All jobs matching `filter`, ordered by title
    pub async fn find(pool: &Pool<Postgres>, filter: &JobFilter) -> Result<Vec<JobRow>, RepositoryError> {
        let (condition, params) = build_where_clause(filter.predicates());
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs {} ORDER BY title",
            where_keyword(&condition)
        );
        debug!("Finding jobs: {} ({} params)", query, params.len());

        let rows = bind_values(sqlx::query_as::<_, JobRow>(&query), &params)
            .fetch_all(pool)
            .await?;

        debug!("Found {} jobs", rows.len());
        Ok(rows)
    }

    /// A single job with its company attached
    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<JobDetail, RepositoryError> {
        debug!("Fetching job: id={}", id);

        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let job = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("No job: {id}")))?;

        let company = CompanyRepository::get(pool, &job.company_handle).await?;
        Ok(JobDetail::new(job, company))
    }

    /// Apply the supplied fields of `update` to job `id`
    ///
    /// Fails with `MalformedRequest` without touching the store if `update`
    /// carries no fields.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        update: &JobUpdate,
    ) -> Result<JobRow, RepositoryError> {
        let (set_clause, params) = build_set_clause(&update.descriptor(), &JOB_FIELDS)?;
        let id_idx = params.len() + 1;

        let query = format!(
            "UPDATE jobs SET {set_clause} WHERE id = ${id_idx} RETURNING {JOB_COLUMNS}"
        );
        debug!("Updating job {}: {}", id, query);

        bind_values(sqlx::query_as::<_, JobRow>(&query), &params)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("No job: {id}")))
    }

    /// Delete job `id`
    pub async fn remove(pool: &Pool<Postgres>, id: i32) -> Result<(), RepositoryError> {
        debug!("Deleting job: id={}", id);

        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(format!("No job: {id}"))),
        }
    }
}
