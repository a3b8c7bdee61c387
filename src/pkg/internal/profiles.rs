use serde::Serialize;
use sqlx::SqliteConnection;
use sqlx::prelude::FromRow;

use crate::prelude::Result;

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Applicant {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub skills: String,
    pub cv_path: Option<String>,
}

impl Applicant {
    pub async fn create(
        conn: &mut SqliteConnection,
        user_id: i64,
        full_name: &str,
    ) -> Result<Self> {
        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            INSERT INTO applicants (user_id, full_name)
            VALUES (?, ?)
            RETURNING id, user_id, full_name, skills, cv_path
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .fetch_one(&mut *conn)
        .await?;
        Ok(applicant)
    }

    pub async fn for_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, Applicant>(
            "SELECT id, user_id, full_name, skills, cv_path FROM applicants WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?)
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        user_id: i64,
        full_name: &str,
        skills: &str,
    ) -> Result<Self> {
        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            UPDATE applicants
            SET full_name = ?, skills = ?, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            RETURNING id, user_id, full_name, skills, cv_path
            "#,
        )
        .bind(full_name)
        .bind(skills)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(applicant)
    }

    pub async fn set_cv_path(
        conn: &mut SqliteConnection,
        applicant_id: i64,
        cv_path: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE applicants SET cv_path = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(cv_path)
        .bind(applicant_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Company {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub description: String,
    pub contact_email: String,
    pub phone: String,
}

impl Company {
    pub async fn create(
        conn: &mut SqliteConnection,
        user_id: i64,
        company_name: &str,
        description: &str,
        contact_email: &str,
        phone: &str,
    ) -> Result<Self> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (user_id, company_name, description, contact_email, phone)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, company_name, description, contact_email, phone
            "#,
        )
        .bind(user_id)
        .bind(company_name)
        .bind(description)
        .bind(contact_email)
        .bind(phone)
        .fetch_one(&mut *conn)
        .await?;
        Ok(company)
    }

    pub async fn for_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, company_name, description, contact_email, phone
            FROM companies WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?)
    }

    /// Profile rows are created lazily the first time a company user
    /// touches their profile.
    pub async fn ensure_for_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Self> {
        if let Some(company) = Self::for_user(conn, user_id).await? {
            return Ok(company);
        }
        Self::create(conn, user_id, "New Company", "", "", "").await
    }

    pub async fn update(
        conn: &mut SqliteConnection,
        user_id: i64,
        company_name: &str,
        description: &str,
        contact_email: &str,
        phone: &str,
    ) -> Result<Self> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET company_name = ?, description = ?, contact_email = ?, phone = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ?
            RETURNING id, user_id, company_name, description, contact_email, phone
            "#,
        )
        .bind(company_name)
        .bind(description)
        .bind(contact_email)
        .bind(phone)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(company)
    }
}
