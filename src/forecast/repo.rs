use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::error::ForecastError;

/// One cached forecast snapshot. The key column kept its historical name
/// `date` even though it holds a full timezone-qualified timestamp.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ForecastRecord {
    #[sqlx(rename = "date")]
    pub ts: OffsetDateTime,
    pub temperature: Option<f64>,
    /// Condition code 1-12.
    pub cond: Option<i16>,
    pub ws10m: Option<f64>,
    pub rain: f64,
}

#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// Point lookup. A miss is a normal outcome, not a failure.
    async fn get(&self, ts: OffsetDateTime) -> Result<Option<ForecastRecord>, ForecastError>;

    /// Insert, or overwrite all non-key fields on timestamp conflict. Must
    /// never leave two rows for the same timestamp.
    async fn upsert(&self, record: &ForecastRecord) -> Result<(), ForecastError>;
}

pub struct PgForecastStore {
    db: PgPool,
}

impl PgForecastStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ForecastStore for PgForecastStore {
    async fn get(&self, ts: OffsetDateTime) -> Result<Option<ForecastRecord>, ForecastError> {
        let record = sqlx::query_as::<_, ForecastRecord>(
            r#"
            SELECT date, temperature, cond, ws10m, rain
            FROM weather_data
            WHERE date = $1
            "#,
        )
        .bind(ts)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }

    async fn upsert(&self, record: &ForecastRecord) -> Result<(), ForecastError> {
        sqlx::query(
            r#"
            INSERT INTO weather_data (date, temperature, cond, ws10m, rain)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (date) DO UPDATE SET
                temperature = EXCLUDED.temperature,
                cond = EXCLUDED.cond,
                ws10m = EXCLUDED.ws10m,
                rain = EXCLUDED.rain
            "#,
        )
        .bind(record.ts)
        .bind(record.temperature)
        .bind(record.cond)
        .bind(record.ws10m)
        .bind(record.rain)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
