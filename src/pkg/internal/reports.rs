use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::pkg::internal::auth::Role;
use crate::prelude::Result;

#[derive(Serialize, Debug)]
pub struct Totals {
    pub applicants: i64,
    pub company_users: i64,
    pub admins: i64,
    pub companies: i64,
    pub jobs: i64,
    pub open_jobs: i64,
    pub closed_jobs: i64,
    pub applications: i64,
}

#[derive(Serialize, Debug, Clone)]
pub struct ActivityItem {
    pub kind: &'static str,
    pub label: String,
    pub at: NaiveDateTime,
}

async fn count_role(conn: &mut SqliteConnection, role: Role) -> Result<i64> {
    Ok(
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&mut *conn)
            .await?,
    )
}

pub async fn totals(conn: &mut SqliteConnection) -> Result<Totals> {
    let applicants = count_role(&mut *conn, Role::Applicant).await?;
    let company_users = count_role(&mut *conn, Role::Company).await?;
    let admins = count_role(&mut *conn, Role::Admin).await?;
    let companies = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
        .fetch_one(&mut *conn)
        .await?;
    let jobs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_listings")
        .fetch_one(&mut *conn)
        .await?;
    let open_jobs =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_listings WHERE is_open = TRUE")
            .fetch_one(&mut *conn)
            .await?;
    let applications = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications")
        .fetch_one(&mut *conn)
        .await?;
    Ok(Totals {
        applicants,
        company_users,
        admins,
        companies,
        jobs,
        open_jobs,
        closed_jobs: jobs - open_jobs,
        applications,
    })
}

/// Last N rows of three tables, tagged, merged, and re-sorted by
/// timestamp. A reporting query, not a maintained structure.
pub async fn recent_activity(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<ActivityItem>> {
    let mut feed = Vec::new();

    let users = sqlx::query_as::<_, (String, NaiveDateTime)>(
        "SELECT name, created_at FROM users ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    feed.extend(users.into_iter().map(|(name, at)| ActivityItem {
        kind: "user_registered",
        label: name,
        at,
    }));

    let jobs = sqlx::query_as::<_, (String, NaiveDateTime)>(
        "SELECT title, posted_at FROM job_listings ORDER BY posted_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    feed.extend(jobs.into_iter().map(|(title, at)| ActivityItem {
        kind: "job_posted",
        label: title,
        at,
    }));

    let applications = sqlx::query_as::<_, (String, NaiveDateTime)>(
        r#"
        SELECT j.title, a.applied_at
        FROM applications a
        JOIN job_listings j ON j.id = a.job_id
        ORDER BY a.applied_at DESC, a.id DESC LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    feed.extend(applications.into_iter().map(|(title, at)| ActivityItem {
        kind: "application_submitted",
        label: title,
        at,
    }));

    feed.sort_by(|a, b| b.at.cmp(&a.at));
    feed.truncate(limit as usize);
    Ok(feed)
}
