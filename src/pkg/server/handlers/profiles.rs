use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    errors::Error,
    pkg::{
        internal::{
            auth::{Role, User},
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
struct ApplicantProfileInput {
    #[validate(length(min = 1, max = 255))]
    full_name: String,
    #[validate(length(max = 2000))]
    skills: String,
}

#[derive(Deserialize, Validate)]
pub struct CompanyProfileInput {
    #[validate(length(min = 1, max = 100))]
    pub company_name: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(email)]
    pub contact_email: String,
    #[validate(length(max = 20))]
    pub phone: String,
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    require_role(&user, Role::Applicant)?;
    let mut conn = state.db_pool.acquire().await?;
    let applicant = Applicant::for_user(&mut conn, user.id).await?;
    Ok(Json(json!({"user": &*user, "profile": applicant})))
}

/// Multipart: full_name, skills, and an optional replacement CV. A new
/// CV displaces the previous file on disk.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    mut multipart: Multipart,
) -> Result<Json<Applicant>> {
    require_role(&user, Role::Applicant)?;

    let mut full_name = String::new();
    let mut skills = String::new();
    let mut cv: Option<CvUpload> = None;
    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "full_name" => full_name = field.text().await?,
            "skills" => skills = field.text().await?,
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
    let input = ApplicantProfileInput { full_name, skills };
    input.validate()?;
    if let Some(upload) = &cv {
        upload.validate()?;
    }

    let mut tx = state.db_pool.begin_txn().await?;
    let applicant = Applicant::for_user(&mut tx, user.id)
        .await?
        .ok_or_else(|| Error::Forbidden("applicant profile not found".into()))?;
    let mut updated = Applicant::update(&mut tx, user.id, &input.full_name, &input.skills).await?;
    if let Some(upload) = &cv {
        let store = CvStore::from_settings();
        let name = store.store(upload).await?;
        Applicant::set_cv_path(&mut tx, applicant.id, &name).await?;
        updated.cv_path = Some(name);
    }
    tx.commit().await?;
    // The old file goes only once the new path is committed.
    if cv.is_some() {
        if let Some(old) = &applicant.cv_path {
            CvStore::from_settings().remove(old).await;
        }
    }
    Ok(Json(updated))
}

pub async fn company_show(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    require_role(&user, Role::Company)?;
    let mut conn = state.db_pool.acquire().await?;
    let company = Company::for_user(&mut conn, user.id).await?;
    Ok(Json(json!({"user": &*user, "profile": company})))
}

pub async fn company_update(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Form(input): Form<CompanyProfileInput>,
) -> Result<Json<Company>> {
    require_role(&user, Role::Company)?;
    input.validate()?;

    let mut tx = state.db_pool.begin_txn().await?;
    Company::ensure_for_user(&mut tx, user.id).await?;
    let company = Company::update(
        &mut tx,
        user.id,
        &input.company_name,
        &input.description,
        &input.contact_email,
        &input.phone,
    )
    .await?;
    tx.commit().await?;

    tracing::info!("company profile saved for user {}", user.id);
    Ok(Json(company))
}
