use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::{
    errors::flash_redirect,
    pkg::{
        internal::{
            adaptors::{applications::selectors::ApplicationSelector, jobs::selectors::JobSelector},
            auth::{Role, User},
            profiles::{Applicant, Company},
        },
        server::state::AppState,
    },
    prelude::Result,
};

/// Role-specific landing view. Admins are bounced to their own
/// dashboard; companies without a finished profile are sent to fix it.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Response> {
    let mut conn = state.db_pool.acquire().await?;
    match user.role {
        Role::Admin => Ok(Redirect::to("/admin/dashboard").into_response()),
        Role::Company => {
            let Some(company) = Company::for_user(&mut conn, user.id).await? else {
                return Ok(flash_redirect(
                    "/company/profile",
                    "please complete your company profile first",
                ));
            };
            let jobs = JobSelector::new(&mut conn).get_for_company(company.id).await?;
            let open_jobs = jobs.iter().filter(|j| j.is_open).count();
            let applications = ApplicationSelector::new(&mut conn)
                .for_company(company.id, None)
                .await?;
            let recent: Vec<_> = applications.iter().take(5).cloned().collect();
            Ok(Json(json!({
                "role": "company",
                "company": company,
                "total_jobs": jobs.len(),
                "open_jobs": open_jobs,
                "total_applications": applications.len(),
                "recent_applications": recent,
                "jobs": jobs,
            }))
            .into_response())
        }
        Role::Applicant => {
            let profile = Applicant::for_user(&mut conn, user.id).await?;
            let open_jobs = JobSelector::new(&mut conn).get_open().await?;
            let applications = match &profile {
                Some(applicant) => {
                    ApplicationSelector::new(&mut conn)
                        .for_applicant(applicant.id)
                        .await?
                }
                None => Vec::new(),
            };
            Ok(Json(json!({
                "role": "applicant",
                "profile": profile,
                "open_jobs": open_jobs,
                "applications": applications,
            }))
            .into_response())
        }
    }
}
