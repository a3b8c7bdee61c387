use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    conf::settings,
    errors::Error,
    pkg::{
        internal::{
            auth::{Role, User},
            profiles::{Applicant, Company},
        },
        server::{
            middlewares::authn::SESSION_COOKIE,
            state::{AppState, GetTxn},
        },
    },
    prelude::Result,
};

#[derive(Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
    pub role: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub remember: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Form(input): Form<RegisterInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    let role = match input.role.as_str() {
        "applicant" => Role::Applicant,
        "company" => Role::Company,
        _ => {
            return Err(Error::BadRequest(
                "role must be applicant or company".into(),
            ));
        }
    };
    let email = input.email.to_lowercase();
    let mut tx = state.db_pool.begin_txn().await?;
    // The UNIQUE index is the duplicate check; a pre-select would race.
    let user = match User::create(&mut tx, &email, &input.name, &input.password, role).await {
        Ok(user) => user,
        Err(Error::Database(e))
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation()) =>
        {
            return Err(Error::Conflict("email already registered".into()));
        }
        Err(e) => return Err(e),
    };
    if role == Role::Applicant {
        Applicant::create(&mut tx, user.id, &input.name).await?;
    } else {
        Company::create(
            &mut tx,
            user.id,
            input.company_name.as_deref().unwrap_or("New Company"),
            input.description.as_deref().unwrap_or(""),
            &user.email,
            input.phone.as_deref().unwrap_or(""),
        )
        .await?;
    }
    tx.commit().await?;

    tracing::info!("registered {} account for {}", &input.role, &user.email);
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "account created successfully, please login"})),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Form(input): Form<LoginInput>,
) -> Result<(HeaderMap, Json<Value>)> {
    input.validate()?;
    let user = match User::retrieve(&state, &input.email.to_lowercase()).await? {
        Some(user) if user.verify_password(&input.password) => user,
        _ => return Err(Error::InvalidCredentials),
    };

    let remember = input.remember.is_some();
    let token = user.issue_token(&state, remember).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&session_cookie(&token, remember))?,
    );
    tracing::info!("user {} logged in", &user.email);
    Ok((
        headers,
        Json(json!({"message": "login successful", "role": user.role})),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<(HeaderMap, Json<Value>)> {
    user.expire_tokens(&state).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"))?,
    );
    tracing::info!("user {} logged out", &user.name);
    Ok((headers, Json(json!({"message": "logged out"}))))
}

fn session_cookie(token: &str, remember: bool) -> String {
    let days = if remember {
        settings.session_remember_days
    } else {
        settings.session_days
    };
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        days * 24 * 60 * 60
    );
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
