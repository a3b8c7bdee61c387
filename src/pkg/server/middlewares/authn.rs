use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    errors::Error,
    pkg::{internal::auth::User, server::state::AppState},
    prelude::Result,
};

pub const SESSION_COOKIE: &str = "_Host_jl_token";

pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let jar = CookieJar::from_headers(&headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        match User::check_token_validity(&state, cookie.value()).await {
            Ok(user) => {
                request.extensions_mut().insert(Arc::new(user));
                return Ok(next.run(request).await);
            }
            Err(_) => {}
        }
    }
    tracing::warn!("session token missing or invalid, authentication denied");
    Err(Error::Unauthorized)
}
