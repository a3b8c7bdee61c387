use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    errors::Error,
    pkg::{
        internal::{
            adaptors::applications::{
                mutators::ApplicationMutator,
                selectors::ApplicationSelector,
                spec::{ApplicationEntry, ApplicationStatus, ApplicationWithContext},
            },
            auth::{Role, User},
            notify::{Notify, StatusChanged},
            profiles::{Applicant, Company},
            uploads::{CvStore, CvUpload},
        },
        server::{
            handlers::require_role,
            state::{AppState, GetTxn},
        },
    },
    prelude::Result,
};

#[derive(Validate)]
struct ApplyInput {
    #[validate(length(min = 100, message = "cover letter must be at least 100 characters long"))]
    cover_letter: String,
}

pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    require_role(&user, Role::Applicant)?;

    let mut cover_letter = String::new();
    let mut cv: Option<CvUpload> = None;
    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "cover_letter" => cover_letter = field.text().await?,
            "cv" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await?;
                if !file_name.is_empty() {
                    cv = Some(CvUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {}
        }
    }
    let input = ApplyInput { cover_letter };
    input.validate()?;
    // The upload is checked before anything touches the database.
    if let Some(upload) = &cv {
        upload.validate()?;
    }

    let mut tx = state.db_pool.begin_txn().await?;
    let applicant = Applicant::for_user(&mut tx, user.id)
        .await?
        .ok_or_else(|| Error::Forbidden("applicant profile not found".into()))?;
    let outcome = ApplicationMutator::new(&mut tx)
        .submit(applicant.id, &applicant.full_name, job_id, &input.cover_letter)
        .await?;
    if let Some(upload) = &cv {
        let store = CvStore::from_settings();
        let name = store.store(upload).await?;
        Applicant::set_cv_path(&mut tx, applicant.id, &name).await?;
    }
    tx.commit().await?;
    // The old file goes only once the new path is committed.
    if cv.is_some() {
        if let Some(old) = &applicant.cv_path {
            CvStore::from_settings().remove(old).await;
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "application submitted, wait for company response",
            "application": outcome.application,
            "job_closed": outcome.listing_closed,
        })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Vec<ApplicationWithContext>>> {
    require_role(&user, Role::Company)?;
    let mut conn = state.db_pool.acquire().await?;
    let company = Company::for_user(&mut conn, user.id)
        .await?
        .ok_or_else(|| Error::Forbidden("please complete your company profile first".into()))?;
    let applications = ApplicationSelector::new(&mut conn)
        .for_company(company.id, None)
        .await?;
    Ok(Json(applications))
}

pub async fn view(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationWithContext>> {
    require_role(&user, Role::Company)?;
    let mut conn = state.db_pool.acquire().await?;
    let application = ApplicationSelector::new(&mut conn)
        .with_context(application_id)
        .await?
        .ok_or(Error::NotFound)?;
    if application.company_user_id != user.id {
        return Err(Error::Forbidden(
            "you are not authorized to view this application".into(),
        ));
    }
    Ok(Json(application))
}

pub async fn accept(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationEntry>> {
    decide(&state, &user, application_id, ApplicationStatus::Accepted).await
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationEntry>> {
    decide(&state, &user, application_id, ApplicationStatus::Rejected).await
}

/// Owner-only Pending -> Accepted/Rejected; writes the status
/// notification to the applicant in the same transaction.
async fn decide(
    state: &AppState,
    user: &User,
    application_id: i64,
    status: ApplicationStatus,
) -> Result<Json<ApplicationEntry>> {
    require_role(user, Role::Company)?;

    let mut tx = state.db_pool.begin_txn().await?;
    let context = ApplicationSelector::new(&mut tx)
        .with_context(application_id)
        .await?
        .ok_or(Error::NotFound)?;
    if context.company_user_id != user.id {
        return Err(Error::Forbidden(
            "you are not authorized to manage this application".into(),
        ));
    }
    let updated = ApplicationMutator::new(&mut tx)
        .set_status(application_id, status)
        .await?
        .ok_or_else(|| Error::Conflict("application has already been decided".into()))?;
    StatusChanged {
        job_title: &context.job_title,
        status,
        application_id,
    }
    .send(&mut tx, context.applicant_user_id)
    .await?;
    tx.commit().await?;

    tracing::info!("application {} marked {:?}", application_id, status);
    Ok(Json(updated))
}
