use std::str::FromStr;
use std::sync::Arc;

use sqlx::{
    Pool, Sqlite, SqlitePool, Transaction,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{conf::settings, prelude::Result};

pub fn db_pool() -> Result<Pool<Sqlite>> {
    let opts = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy_with(opts);
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<SqlitePool>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
        })
    }
}

pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Sqlite>>;
}

impl GetTxn for Arc<SqlitePool> {
    async fn begin_txn(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.begin().await?)
    }
}

/// Fresh in-memory database running the real migrations. A single
/// connection keeps every query on the same `:memory:` instance.
#[cfg(test)]
pub async fn test_state() -> Result<AppState> {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;
    crate::cmd::migrate::MIGRATOR.run(&pool).await?;
    Ok(AppState {
        db_pool: Arc::new(pool),
    })
}
