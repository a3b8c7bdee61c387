use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::applications::spec::{
    ApplicationEntry, ApplicationStatus, ApplicationWithContext,
};
use crate::prelude::Result;

const CONTEXT_SELECT: &str = r#"
    SELECT a.id, a.status, a.notes, a.applied_at, a.job_id, j.title AS job_title,
           a.applicant_id, ap.full_name AS applicant_name, ap.user_id AS applicant_user_id,
           ap.cv_path, c.user_id AS company_user_id
    FROM applications a
    JOIN job_listings j ON j.id = a.job_id
    JOIN companies c ON c.id = j.company_id
    JOIN applicants ap ON ap.id = a.applicant_id
"#;

pub struct ApplicationSelector<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(
            "SELECT id, applicant_id, job_id, status, notes, applied_at, updated_at \
             FROM applications WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn exists_for(&mut self, applicant_id: i64, job_id: i64) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE applicant_id = ? AND job_id = ?",
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Applications that hold a slot: everything not rejected.
    pub async fn active_count(&mut self, job_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE job_id = ? AND status IN (?, ?)",
        )
        .bind(job_id)
        .bind(ApplicationStatus::Pending)
        .bind(ApplicationStatus::Accepted)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    /// Users behind every applicant who applied to this job; recipients
    /// of the removal notice when a listing is deleted.
    pub async fn applicant_user_ids_for_job(&mut self, job_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT ap.user_id
            FROM applications a
            JOIN applicants ap ON ap.id = a.applicant_id
            WHERE a.job_id = ?
            "#,
        )
        .bind(job_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn with_context(&mut self, id: i64) -> Result<Option<ApplicationWithContext>> {
        let row = sqlx::query_as::<_, ApplicationWithContext>(&format!(
            "{CONTEXT_SELECT} WHERE a.id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn for_company(
        &mut self,
        company_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<ApplicationWithContext>> {
        let mut query = format!("{CONTEXT_SELECT} WHERE j.company_id = ? ORDER BY a.applied_at DESC");
        if limit.is_some() {
            query.push_str(" LIMIT ?");
        }
        let mut q = sqlx::query_as::<_, ApplicationWithContext>(&query).bind(company_id);
        if let Some(limit) = limit {
            q = q.bind(limit);
        }
        let rows = q.fetch_all(&mut *self.pool).await?;
        Ok(rows)
    }

    pub async fn for_applicant(&mut self, applicant_id: i64) -> Result<Vec<ApplicationWithContext>> {
        let rows = sqlx::query_as::<_, ApplicationWithContext>(&format!(
            "{CONTEXT_SELECT} WHERE a.applicant_id = ? ORDER BY a.applied_at DESC"
        ))
        .bind(applicant_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
