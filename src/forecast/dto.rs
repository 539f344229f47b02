use serde::{Deserialize, Serialize};

use crate::forecast::repo::ForecastRecord;
use crate::forecast::slots::{format_timestamp, SlotDate};

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_count")]
    pub count: usize,
}
fn default_width() -> u32 {
    60
}
fn default_count() -> usize {
    7
}

/// Response shape of `GET /forecast`. `icon` and `condition` both carry the
/// condition code; the UI maps one to an icon and one to a label.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub time: String,
    pub temperature: Option<f64>,
    pub icon: Option<i16>,
    pub condition: Option<i16>,
    pub wind: Option<f64>,
    pub rain: f64,
}

impl From<&ForecastRecord> for ForecastResponse {
    fn from(record: &ForecastRecord) -> Self {
        Self {
            time: format_timestamp(&record.ts),
            temperature: record.temperature,
            icon: record.cond,
            condition: record.cond,
            wind: record.ws10m,
            rain: record.rain,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlotForecast {
    pub date: SlotDate,
    pub time: String,
    pub forecast: Option<ForecastResponse>,
}

#[derive(Debug, Serialize)]
pub struct SlotBatchResponse {
    pub bucket_minutes: u32,
    pub slots: Vec<SlotForecast>,
    /// First failure message when some slots could not be resolved.
    pub error: Option<String>,
}
