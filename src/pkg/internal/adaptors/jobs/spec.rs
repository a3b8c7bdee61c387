use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone)]
pub struct JobEntry {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub qualifications: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub slots: i64,
    pub is_open: bool,
    pub posted_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Public job view: listing fields plus the owning company's display
/// name and how many applications it has drawn so far.
#[derive(Serialize, FromRow, Debug, Clone)]
pub struct JobDetail {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub description: String,
    pub qualifications: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub slots: i64,
    pub is_open: bool,
    pub company: String,
    pub applied_count: i64,
}
