use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::prelude::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JobPosted,
    ApplicationReceived,
    ApplicationStatus,
    JobRemoved,
}

#[derive(Serialize, FromRow, Debug, Clone)]
pub struct NotificationEntry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub ref_id: Option<i64>,
    pub created_at: chrono::NaiveDateTime,
}
