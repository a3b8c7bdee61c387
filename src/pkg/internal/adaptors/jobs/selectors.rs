use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::jobs::spec::{JobDetail, JobEntry};
use crate::prelude::Result;

const JOB_COLUMNS: &str = "id, company_id, title, description, qualifications, location, \
     salary_min, salary_max, slots, is_open, posted_at, updated_at";

pub struct JobSelector<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_listings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_open(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_listings WHERE is_open = TRUE ORDER BY posted_at DESC"
        ))
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_for_company(&mut self, company_id: i64) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_listings WHERE company_id = ? ORDER BY posted_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn detail(&mut self, id: i64) -> Result<Option<JobDetail>> {
        let row = sqlx::query_as::<_, JobDetail>(
            r#"
            SELECT j.id, j.title, j.location, j.description, j.qualifications,
                   j.salary_min, j.salary_max, j.slots, j.is_open,
                   c.company_name AS company,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS applied_count
            FROM job_listings j
            JOIN companies c ON c.id = j.company_id
            WHERE j.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// The user id behind the company that owns this listing; ownership
    /// checks compare it against the session user.
    pub async fn owner_user_id(&mut self, job_id: i64) -> Result<Option<i64>> {
        let row = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT c.user_id
            FROM job_listings j
            JOIN companies c ON c.id = j.company_id
            WHERE j.id = ?
            "#,
        )
        .bind(job_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
