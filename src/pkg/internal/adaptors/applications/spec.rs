use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::prelude::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct ApplicationEntry {
    pub id: i64,
    pub applicant_id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Application joined with its listing and applicant, as shown on the
/// company review screens and the applicant dashboard.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct ApplicationWithContext {
    pub id: i64,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_at: chrono::NaiveDateTime,
    pub job_id: i64,
    pub job_title: String,
    pub applicant_id: i64,
    pub applicant_name: String,
    pub applicant_user_id: i64,
    pub cv_path: Option<String>,
    pub company_user_id: i64,
}
