use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::notifications::spec::{NotificationEntry, NotificationKind};
use crate::prelude::Result;

pub struct NotificationSelector<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> NotificationSelector<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        NotificationSelector { pool }
    }

    pub async fn recent(&mut self, user_id: i64, limit: i64) -> Result<Vec<NotificationEntry>> {
        let rows = sqlx::query_as::<_, NotificationEntry>(
            "SELECT id, user_id, title, message, kind, is_read, ref_id, created_at \
             FROM notifications WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn unread_count(&mut self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_by_kind(&mut self, user_id: i64, kind: NotificationKind) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND kind = ?",
        )
        .bind(user_id)
        .bind(kind)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }
}
