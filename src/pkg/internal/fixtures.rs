use sqlx::SqliteConnection;

use crate::pkg::internal::adaptors::jobs::{mutators::JobMutator, spec::JobEntry};
use crate::pkg::internal::auth::{Role, User};
use crate::pkg::internal::profiles::{Applicant, Company};
use crate::pkg::server::handlers::jobs::JobInput;
use crate::prelude::Result;

pub async fn seed_company(conn: &mut SqliteConnection, email: &str) -> Result<(User, Company)> {
    let user = User::create(conn, email, "Hiring Manager", "pw-company", Role::Company).await?;
    let company = Company::create(conn, user.id, "Acme Corp", "widgets", email, "555-0100").await?;
    Ok((user, company))
}

pub async fn seed_applicant(
    conn: &mut SqliteConnection,
    email: &str,
    name: &str,
) -> Result<(User, Applicant)> {
    let user = User::create(conn, email, name, "pw-applicant", Role::Applicant).await?;
    let applicant = Applicant::create(conn, user.id, name).await?;
    Ok((user, applicant))
}

pub async fn seed_job(
    conn: &mut SqliteConnection,
    company_id: i64,
    title: &str,
    slots: i64,
) -> Result<JobEntry> {
    JobMutator::new(conn)
        .create(
            company_id,
            &JobInput {
                title: title.into(),
                location: "Remote".into(),
                description: "Build and ship".into(),
                qualifications: "Experience shipping software".into(),
                salary_min: Some(50_000),
                salary_max: Some(90_000),
                slots,
            },
        )
        .await
}
