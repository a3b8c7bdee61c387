use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::applications::spec::ApplicationStatus;
use crate::pkg::internal::adaptors::notifications::mutators::NotificationMutator;
use crate::pkg::internal::adaptors::notifications::spec::NotificationKind;
use crate::prelude::Result;

/// One implementor per trigger; `send` writes the row for a single
/// recipient. Fire-and-forget: callers do not roll back on failure.
pub trait Notify {
    fn compose(&self) -> (NotificationKind, String, String, Option<i64>);

    async fn send(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<()> {
        let (kind, title, message, ref_id) = self.compose();
        NotificationMutator::new(conn)
            .push(user_id, kind, &title, &message, ref_id)
            .await?;
        Ok(())
    }
}

pub struct ApplicationReceived<'a> {
    pub job_title: &'a str,
    pub applicant_name: &'a str,
    pub application_id: i64,
}

impl<'a> Notify for ApplicationReceived<'a> {
    fn compose(&self) -> (NotificationKind, String, String, Option<i64>) {
        (
            NotificationKind::ApplicationReceived,
            "New application".into(),
            format!(
                "{} applied to your listing \"{}\"",
                self.applicant_name, self.job_title
            ),
            Some(self.application_id),
        )
    }
}

pub struct StatusChanged<'a> {
    pub job_title: &'a str,
    pub status: ApplicationStatus,
    pub application_id: i64,
}

impl<'a> Notify for StatusChanged<'a> {
    fn compose(&self) -> (NotificationKind, String, String, Option<i64>) {
        let verdict = match self.status {
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Pending => "pending",
        };
        (
            NotificationKind::ApplicationStatus,
            "Application update".into(),
            format!(
                "Your application for \"{}\" was {}",
                self.job_title, verdict
            ),
            Some(self.application_id),
        )
    }
}

pub struct JobRemoved<'a> {
    pub job_title: &'a str,
}

impl<'a> Notify for JobRemoved<'a> {
    fn compose(&self) -> (NotificationKind, String, String, Option<i64>) {
        (
            NotificationKind::JobRemoved,
            "Listing removed".into(),
            format!(
                "The listing \"{}\" you applied to has been removed",
                self.job_title
            ),
            None,
        )
    }
}

pub struct JobPosted<'a> {
    pub company_name: &'a str,
    pub job_title: &'a str,
    pub job_id: i64,
}

impl<'a> JobPosted<'a> {
    /// Broadcast to every applicant user, one row each.
    pub async fn broadcast(&self, conn: &mut SqliteConnection) -> Result<u64> {
        NotificationMutator::new(conn)
            .broadcast_to_applicants(
                NotificationKind::JobPosted,
                "New job posted",
                &format!("{} is hiring: \"{}\"", self.company_name, self.job_title),
                Some(self.job_id),
            )
            .await
    }
}
