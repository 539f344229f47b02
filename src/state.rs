use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::forecast::repo::{ForecastStore, PgForecastStore};
use crate::forecast::upstream::{ForecastProvider, TmdClient};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ForecastStore>,
    pub provider: Arc<dyn ForecastProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }

        let store = Arc::new(PgForecastStore::new(db)) as Arc<dyn ForecastStore>;
        let provider =
            Arc::new(TmdClient::new(&config.upstream)?) as Arc<dyn ForecastProvider>;

        Ok(Self {
            store,
            provider,
            config,
        })
    }

    pub fn from_parts(
        store: Arc<dyn ForecastStore>,
        provider: Arc<dyn ForecastProvider>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }
}
