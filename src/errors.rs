use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;

/// Crate-wide error type. Variants map one-to-one onto the user-facing
/// error taxonomy: validation, conflict, not-found, authn, authz, and a
/// catch-all internal bucket for database/IO failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadUpload(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error(transparent)]
    Header(#[from] axum::http::header::InvalidHeaderValue),
    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errs) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"error": "validation failed", "fields": errs})),
            )
                .into_response(),
            Error::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            Error::BadUpload(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            Error::Multipart(e) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": e.to_string()}))).into_response()
            }
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid email or password"})),
            )
                .into_response(),
            Error::Unauthorized => Redirect::to("/login").into_response(),
            Error::Forbidden(msg) => flash_redirect("/dashboard", &msg),
            Error::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
            }
            Error::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({"error": msg}))).into_response()
            }
            other => {
                tracing::error!("request failed: {:?}", &other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

/// Redirect carrying a short-lived flash cookie so the landing page can
/// surface the warning. Spaces become '+' to keep the cookie value legal.
pub fn flash_redirect(to: &str, message: &str) -> Response {
    let mut response = Redirect::to(to).into_response();
    let cookie = format!("jl_flash={}; Path=/; Max-Age=60", message.replace(' ', "+"));
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
