use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use crate::{
    pkg::{
        internal::{
            auth::{Role, User},
            reports::{self, ActivityItem, Totals},
        },
        server::{handlers::require_role, state::AppState},
    },
    prelude::Result,
};

const ACTIVITY_WINDOW: i64 = 10;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Totals>> {
    require_role(&user, Role::Admin)?;
    let mut conn = state.db_pool.acquire().await?;
    Ok(Json(reports::totals(&mut conn).await?))
}

pub async fn activity(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Vec<ActivityItem>>> {
    require_role(&user, Role::Admin)?;
    let mut conn = state.db_pool.acquire().await?;
    Ok(Json(reports::recent_activity(&mut conn, ACTIVITY_WINDOW).await?))
}
