use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::handlers::jobs::JobInput;
use crate::prelude::Result;

const RETURNING: &str = "RETURNING id, company_id, title, description, qualifications, location, \
     salary_min, salary_max, slots, is_open, posted_at, updated_at";

pub struct JobMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, company_id: i64, job: &JobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO job_listings
                (company_id, title, description, qualifications, location,
                 salary_min, salary_max, slots)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            {RETURNING}
            "#
        ))
        .bind(company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.qualifications)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.slots)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i64, job: &JobInput) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            UPDATE job_listings
            SET title = ?, description = ?, qualifications = ?, location = ?,
                salary_min = ?, salary_max = ?, slots = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            {RETURNING}
            "#
        ))
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.qualifications)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.slots)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_open(&mut self, id: i64, is_open: bool) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            UPDATE job_listings
            SET is_open = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            {RETURNING}
            "#
        ))
        .bind(is_open)
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Applications go with the listing through the FK cascade.
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_listings WHERE id = ?")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
