use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::{
    conf::settings,
    errors::Error,
    pkg::server::state::AppState,
    prelude::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Applicant,
    Company,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type)]
#[sqlx(rename_all = "lowercase")]
pub enum TokenStatus {
    Active,
    Expired,
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub async fn create(
        conn: &mut SqliteConnection,
        email: &str,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<Self> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, password_hash, role
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&mut *conn)
        .await?;
        Ok(user)
    }

    pub async fn retrieve(state: &AppState, email: &str) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&*state.db_pool)
        .await?)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }

    /// Opens a session: inserts an active token row and hands back the
    /// cookie value. "Remember me" stretches the expiry to 30 days.
    pub async fn issue_token(&self, state: &AppState, remember: bool) -> Result<String> {
        let days = if remember {
            settings.session_remember_days
        } else {
            settings.session_days
        };
        let token = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, status, expiry)
            VALUES (?, ?, ?, datetime('now', ?))
            "#,
        )
        .bind(&token)
        .bind(self.id)
        .bind(TokenStatus::Active)
        .bind(format!("+{} days", days))
        .execute(&*state.db_pool)
        .await?;
        tracing::debug!("issued session token for {}", &self.email);
        Ok(token)
    }

    pub async fn expire_tokens(&self, state: &AppState) -> Result<()> {
        sqlx::query("UPDATE sessions SET status = ? WHERE user_id = ? AND status = ?")
            .bind(TokenStatus::Expired)
            .bind(self.id)
            .bind(TokenStatus::Active)
            .execute(&*state.db_pool)
            .await?;
        Ok(())
    }

    pub async fn check_token_validity(state: &AppState, token_str: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.status = ? AND s.expiry > datetime('now')
            "#,
        )
        .bind(token_str)
        .bind(TokenStatus::Active)
        .fetch_optional(&*state.db_pool)
        .await?;
        user.ok_or(Error::Unauthorized)
    }
}
