use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::notifications::spec::{NotificationEntry, NotificationKind};
use crate::prelude::Result;

pub struct NotificationMutator<'a> {
    pool: &'a mut SqliteConnection,
}

impl<'a> NotificationMutator<'a> {
    pub fn new(pool: &'a mut SqliteConnection) -> Self {
        NotificationMutator { pool }
    }

    pub async fn push(
        &mut self,
        user_id: i64,
        kind: NotificationKind,
        title: &str,
        message: &str,
        ref_id: Option<i64>,
    ) -> Result<NotificationEntry> {
        let row = sqlx::query_as::<_, NotificationEntry>(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, ref_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, title, message, kind, is_read, ref_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(message)
        .bind(kind)
        .bind(ref_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// One row per existing applicant user. Deliberately unbatched: the
    /// fan-out is O(number of applicants) per posted job.
    pub async fn broadcast_to_applicants(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        ref_id: Option<i64>,
    ) -> Result<u64> {
        let user_ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM applicants")
            .fetch_all(&mut *self.pool)
            .await?;
        if user_ids.is_empty() {
            return Ok(0);
        }
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT INTO notifications (user_id, title, message, kind, ref_id) ");
        query_builder.push_values(user_ids, |mut b, user_id| {
            b.push_bind(user_id)
                .push_bind(title)
                .push_bind(message)
                .push_bind(kind)
                .push_bind(ref_id);
        });
        let result = query_builder.build().execute(&mut *self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_read(&mut self, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&mut self, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn clear(&mut self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
