use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::error::RepositoryError;
use crate::db::models::CompanyRow;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Read-only access to companies, used as the join target for job details
pub struct CompanyRepository;

impl CompanyRepository {
    pub async fn get(pool: &Pool<Postgres>, handle: &str) -> Result<CompanyRow, RepositoryError> {
        debug!("Fetching company: handle={}", handle);

        let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1");
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("No company: {handle}")))
    }
}
