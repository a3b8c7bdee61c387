use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqliteConnection;
use validator::Validate;

use crate::{
    errors::Error,
    pkg::{
        internal::{
            adaptors::{
                applications::selectors::ApplicationSelector,
                jobs::{mutators::JobMutator, selectors::JobSelector, spec::JobEntry},
            },
            auth::{Role, User},
            notify::{JobPosted, JobRemoved, Notify},
            profiles::Company,
        },
        server::{
            handlers::require_role,
            state::{AppState, GetTxn},
        },
    },
    prelude::Result,
};

#[derive(Deserialize, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub qualifications: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    #[validate(range(min = 1))]
    pub slots: i64,
}

/// Public landing list: open listings, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<JobEntry>>> {
    let mut conn = state.db_pool.acquire().await?;
    let jobs = JobSelector::new(&mut conn).get_open().await?;
    Ok(Json(jobs))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db_pool.acquire().await?;
    let job = JobSelector::new(&mut conn)
        .detail(job_id)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(job))
}

pub async fn add_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Form(input): Form<JobInput>,
) -> Result<impl IntoResponse> {
    require_role(&user, Role::Company)?;
    input.validate()?;

    let mut tx = state.db_pool.begin_txn().await?;
    let company = Company::for_user(&mut tx, user.id)
        .await?
        .ok_or_else(|| Error::Forbidden("please complete your company profile first".into()))?;
    let job = JobMutator::new(&mut tx).create(company.id, &input).await?;
    let reached = JobPosted {
        company_name: &company.company_name,
        job_title: &job.title,
        job_id: job.id,
    }
    .broadcast(&mut tx)
    .await?;
    tx.commit().await?;

    tracing::info!("company {} posted job {}, notified {} applicants", company.id, job.id, reached);
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn edit_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<i64>,
    Form(input): Form<JobInput>,
) -> Result<Json<JobEntry>> {
    require_role(&user, Role::Company)?;
    input.validate()?;

    let mut tx = state.db_pool.begin_txn().await?;
    ensure_owner(&mut tx, job_id, &user, "edit").await?;
    let job = JobMutator::new(&mut tx)
        .update(job_id, &input)
        .await?
        .ok_or(Error::NotFound)?;
    tx.commit().await?;
    Ok(Json(job))
}

pub async fn close_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobEntry>> {
    set_listing_open(&state, &user, job_id, false).await
}

pub async fn open_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobEntry>> {
    set_listing_open(&state, &user, job_id, true).await
}

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    require_role(&user, Role::Company)?;

    let mut tx = state.db_pool.begin_txn().await?;
    ensure_owner(&mut tx, job_id, &user, "delete").await?;
    let job = JobSelector::new(&mut tx)
        .get_by_id(job_id)
        .await?
        .ok_or(Error::NotFound)?;
    if job.is_open {
        return Err(Error::Conflict("close the job before deleting it".into()));
    }

    let affected = ApplicationSelector::new(&mut tx)
        .applicant_user_ids_for_job(job_id)
        .await?;
    for user_id in &affected {
        JobRemoved {
            job_title: &job.title,
        }
        .send(&mut tx, *user_id)
        .await?;
    }
    JobMutator::new(&mut tx).delete(job_id).await?;
    tx.commit().await?;

    tracing::info!("job {} deleted, {} applicants notified", job_id, affected.len());
    Ok(Json(json!({"message": "job deleted"})))
}

async fn set_listing_open(
    state: &AppState,
    user: &User,
    job_id: i64,
    is_open: bool,
) -> Result<Json<JobEntry>> {
    require_role(user, Role::Company)?;
    let mut tx = state.db_pool.begin_txn().await?;
    ensure_owner(&mut tx, job_id, user, if is_open { "open" } else { "close" }).await?;
    let job = JobMutator::new(&mut tx)
        .set_open(job_id, is_open)
        .await?
        .ok_or(Error::NotFound)?;
    tx.commit().await?;
    Ok(Json(job))
}

async fn ensure_owner(
    conn: &mut SqliteConnection,
    job_id: i64,
    user: &User,
    action: &str,
) -> Result<()> {
    match JobSelector::new(conn).owner_user_id(job_id).await? {
        None => Err(Error::NotFound),
        Some(owner) if owner == user.id => Ok(()),
        Some(_) => Err(Error::Forbidden(format!(
            "you are not authorized to {action} this job"
        ))),
    }
}
