use ai::clients::openai::Client as AIClient;
use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, Transaction};
use standard_error::StandardError;
use std::sync::Arc;

use crate::{conf::settings, pkg::internal::storage, prelude::Result};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

/// Process-wide handles, constructed once at startup and passed explicitly
/// into the server, worker, and pipeline.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub ai_client: Arc<AIClient>,
    pub s3_client: Arc<S3Client>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let ai = AIClient::from_url(&settings.ai_key, &settings.ai_endpoint)
            .map_err(|_| StandardError::new("ERR-AI-000"))?;
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
            ai_client: Arc::new(ai),
            s3_client: Arc::new(storage::s3_client().await),
        })
    }
}

#[async_trait::async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait::async_trait]
impl GetTxn for Arc<PgPool> {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}
