use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    errors::Error,
    pkg::{
        internal::{
            adaptors::notifications::{
                mutators::NotificationMutator, selectors::NotificationSelector,
            },
            auth::User,
        },
        server::state::AppState,
    },
    prelude::Result,
};

const RECENT_LIMIT: i64 = 20;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let notifications = NotificationSelector::new(&mut conn)
        .recent(user.id, RECENT_LIMIT)
        .await?;
    let unread = NotificationSelector::new(&mut conn)
        .unread_count(user.id)
        .await?;
    Ok(Json(json!({"notifications": notifications, "unread": unread})))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(notification_id): Path<i64>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let marked = NotificationMutator::new(&mut conn)
        .mark_read(notification_id, user.id)
        .await?;
    if !marked {
        return Err(Error::NotFound);
    }
    Ok(Json(json!({"message": "notification marked read"})))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let updated = NotificationMutator::new(&mut conn)
        .mark_all_read(user.id)
        .await?;
    Ok(Json(json!({"updated": updated})))
}

pub async fn clear(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let deleted = NotificationMutator::new(&mut conn).clear(user.id).await?;
    Ok(Json(json!({"deleted": deleted})))
}
