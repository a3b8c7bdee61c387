use sqlx::SqliteConnection;

use crate::errors::Error;
use crate::pkg::internal::adaptors::applications::selectors::ApplicationSelector;
use crate::pkg::internal::adaptors::applications::spec::{ApplicationEntry, ApplicationStatus};
use crate::pkg::internal::adaptors::jobs::{mutators::JobMutator, selectors::JobSelector};
use crate::pkg::internal::notify::{ApplicationReceived, Notify};
use crate::prelude::Result;

const RETURNING: &str =
    "RETURNING id, applicant_id, job_id, status, notes, applied_at, updated_at";

#[derive(Debug)]
pub struct SubmitOutcome {
    pub application: ApplicationEntry,
    /// True when this submission took the last slot and closed the listing.
    pub listing_closed: bool,
}

pub struct ApplicationMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        ApplicationMutator { pool }
    }

    /// Full submission flow. Callers run this inside a transaction so the
    /// capacity check, the insert, and the auto-close commit atomically;
    /// two racing applicants cannot both pass the check.
    ///
    /// Reject order: missing listing, closed listing, no slots left,
    /// duplicate application.
    pub async fn submit(
        &mut self,
        applicant_id: i64,
        applicant_name: &str,
        job_id: i64,
        notes: &str,
    ) -> Result<SubmitOutcome> {
        let job = JobSelector::new(&mut *self.pool)
            .get_by_id(job_id)
            .await?
            .ok_or(Error::NotFound)?;
        if !job.is_open {
            return Err(Error::Conflict("this job is closed".into()));
        }
        let active = ApplicationSelector::new(&mut *self.pool)
            .active_count(job_id)
            .await?;
        if active >= job.slots {
            return Err(Error::Conflict(
                "no application slots left for this job".into(),
            ));
        }
        if ApplicationSelector::new(&mut *self.pool)
            .exists_for(applicant_id, job_id)
            .await?
        {
            return Err(Error::Conflict(
                "you have already applied for this job".into(),
            ));
        }

        let application = self.create(applicant_id, job_id, notes).await?;

        let listing_closed = active + 1 >= job.slots;
        if listing_closed {
            JobMutator::new(&mut *self.pool)
                .set_open(job_id, false)
                .await?;
            tracing::info!("job {} reached capacity and was closed", job_id);
        }

        if let Some(owner) = JobSelector::new(&mut *self.pool)
            .owner_user_id(job_id)
            .await?
        {
            ApplicationReceived {
                job_title: &job.title,
                applicant_name,
                application_id: application.id,
            }
            .send(&mut *self.pool, owner)
            .await?;
        }

        Ok(SubmitOutcome {
            application,
            listing_closed,
        })
    }

    pub async fn create(
        &mut self,
        applicant_id: i64,
        job_id: i64,
        notes: &str,
    ) -> Result<ApplicationEntry> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            INSERT INTO applications (applicant_id, job_id, notes)
            VALUES (?, ?, ?)
            {RETURNING}
            "#
        ))
        .bind(applicant_id)
        .bind(job_id)
        .bind(notes)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Pending is the only state a decision can leave from; a decided
    /// application yields None.
    pub async fn set_status(
        &mut self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<_, ApplicationEntry>(&format!(
            r#"
            UPDATE applications
            SET status = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND status = ?
            {RETURNING}
            "#
        ))
        .bind(status)
        .bind(id)
        .bind(ApplicationStatus::Pending)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::notifications::selectors::NotificationSelector;
    use crate::pkg::internal::adaptors::notifications::spec::NotificationKind;
    use crate::pkg::internal::fixtures::{seed_applicant, seed_company, seed_job};
    use crate::pkg::server::state::test_state;
    use crate::prelude::Result;

    #[tokio::test]
    async fn test_last_slot_closes_listing_and_notifies_owner() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (owner, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 1).await?;
        let (_, applicant) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        let outcome = ApplicationMutator::new(&mut tx)
            .submit(applicant.id, &applicant.full_name, job.id, "please hire me")
            .await?;
        assert_eq!(outcome.application.status, ApplicationStatus::Pending);
        assert!(outcome.listing_closed);

        let job = JobSelector::new(&mut tx).get_by_id(job.id).await?.unwrap();
        assert!(!job.is_open);

        let received = NotificationSelector::new(&mut tx)
            .count_by_kind(owner.id, NotificationKind::ApplicationReceived)
            .await?;
        assert_eq!(received, 1);
        tx.commit().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_listing_rejects_submission() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 1).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;
        let (_, bo) = seed_applicant(&mut tx, "b@example.com", "Bo").await?;

        ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        let err = ApplicationMutator::new(&mut tx)
            .submit(bo.id, &bo.full_name, job.id, "second")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(ref msg) if msg.contains("closed")));
        Ok(())
    }

    #[tokio::test]
    async fn test_capacity_guard_on_reopened_listing() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 1).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;
        let (_, bo) = seed_applicant(&mut tx, "b@example.com", "Bo").await?;

        ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        // Owner reopens by hand; the slot is still held by Ana.
        JobMutator::new(&mut tx).set_open(job.id, true).await?;

        let err = ApplicationMutator::new(&mut tx)
            .submit(bo.id, &bo.full_name, job.id, "second")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(ref msg) if msg.contains("slots")));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_application_rejected() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 3).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        let err = ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "again")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(ref msg) if msg.contains("already applied")));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_listing_is_not_found() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        let err = ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, 999, "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_frees_a_slot_but_not_the_listing() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 1).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        let outcome = ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        ApplicationMutator::new(&mut tx)
            .set_status(outcome.application.id, ApplicationStatus::Rejected)
            .await?;

        let active = ApplicationSelector::new(&mut tx).active_count(job.id).await?;
        assert_eq!(active, 0);
        // Closed -> Open stays a manual transition.
        let job = JobSelector::new(&mut tx).get_by_id(job.id).await?.unwrap();
        assert!(!job.is_open);
        Ok(())
    }

    #[tokio::test]
    async fn test_decided_application_cannot_be_redecided() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 2).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        let outcome = ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        let accepted = ApplicationMutator::new(&mut tx)
            .set_status(outcome.application.id, ApplicationStatus::Accepted)
            .await?;
        assert_eq!(accepted.unwrap().status, ApplicationStatus::Accepted);

        let again = ApplicationMutator::new(&mut tx)
            .set_status(outcome.application.id, ApplicationStatus::Rejected)
            .await?;
        assert!(again.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_listing_cascades_to_applications() -> Result<()> {
        let state = test_state().await?;
        let mut tx = state.db_pool.begin().await?;
        let (_, company) = seed_company(&mut tx, "acme@example.com").await?;
        let job = seed_job(&mut tx, company.id, "Backend Engineer", 2).await?;
        let (_, ana) = seed_applicant(&mut tx, "a@example.com", "Ana").await?;

        ApplicationMutator::new(&mut tx)
            .submit(ana.id, &ana.full_name, job.id, "first")
            .await?;
        JobMutator::new(&mut tx).set_open(job.id, false).await?;
        assert!(JobMutator::new(&mut tx).delete(job.id).await?);

        let remaining = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE job_id = ?",
        )
        .bind(job.id)
        .fetch_one(&mut *tx)
        .await?;
        assert_eq!(remaining, 0);
        Ok(())
    }
}
