use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime,
};

use crate::config::UpstreamConfig;
use crate::error::ForecastError;

const FIELDS: &str = "tc,cond,rain,ws10m";

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// One hourly forecast entry as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamEntry {
    pub time: String,
    pub data: UpstreamData,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UpstreamData {
    pub tc: Option<f64>,
    pub cond: Option<i16>,
    pub ws10m: Option<f64>,
    pub rain: Option<f64>,
}

impl UpstreamEntry {
    /// Provider timestamps are RFC 3339 strings with the +07:00 offset.
    /// Unparseable entries are skipped by callers.
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.time, &Rfc3339).ok()
    }
}

#[derive(Debug, Deserialize)]
struct PlaceResponse {
    #[serde(rename = "WeatherForecasts", default)]
    weather_forecasts: Vec<LocationForecasts>,
}

#[derive(Debug, Deserialize)]
struct LocationForecasts {
    #[serde(default)]
    forecasts: Vec<UpstreamEntry>,
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch `duration_hours` hourly entries starting at `hour` on `date`.
    /// One outbound request per call; no automatic retry.
    async fn fetch_window(
        &self,
        date: Date,
        hour: u8,
        duration_hours: u8,
    ) -> Result<Vec<UpstreamEntry>, ForecastError>;
}

/// Client for the TMD hourly place forecast endpoint.
pub struct TmdClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    province: String,
}

impl TmdClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            province: config.province.clone(),
        })
    }
}

#[async_trait]
impl ForecastProvider for TmdClient {
    async fn fetch_window(
        &self,
        date: Date,
        hour: u8,
        duration_hours: u8,
    ) -> Result<Vec<UpstreamEntry>, ForecastError> {
        let date_param = date
            .format(DATE_FORMAT)
            .map_err(|e| ForecastError::Upstream(format!("format date parameter: {e}")))?;
        let hour_param = hour.to_string();
        let duration_param = duration_hours.to_string();

        let url = format!("{}/forecast/location/hourly/place", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("province", self.province.as_str()),
                ("fields", FIELDS),
                ("date", date_param.as_str()),
                ("hour", hour_param.as_str()),
                ("duration", duration_param.as_str()),
            ])
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ForecastError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Upstream(format!(
                "API request failed with status {status}"
            )));
        }

        let payload: PlaceResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::Upstream(format!("decode response: {e}")))?;

        Ok(payload
            .weather_forecasts
            .into_iter()
            .next()
            .map(|location| location.forecasts)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn deserializes_place_response_envelope() {
        let payload = r#"{
            "WeatherForecasts": [
                {
                    "location": { "name": "กาฬสินธุ์", "lat": 16.43, "lon": 103.50 },
                    "forecasts": [
                        {
                            "time": "2024-01-01T10:00:00+07:00",
                            "data": { "tc": 28.5, "cond": 2, "ws10m": 12.0, "rain": 10.0 }
                        },
                        {
                            "time": "2024-01-01T11:00:00+07:00",
                            "data": { "tc": 29.1, "cond": 1, "ws10m": 9.4, "rain": 0.0 }
                        }
                    ]
                }
            ]
        }"#;

        let parsed: PlaceResponse = serde_json::from_str(payload).unwrap();
        let forecasts = &parsed.weather_forecasts[0].forecasts;
        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].data.tc, Some(28.5));
        assert_eq!(forecasts[0].data.cond, Some(2));
        assert_eq!(
            forecasts[0].timestamp(),
            Some(datetime!(2024-01-01 10:00 +7))
        );
    }

    #[test]
    fn missing_numeric_fields_deserialize_as_none() {
        let entry: UpstreamEntry = serde_json::from_str(
            r#"{ "time": "2024-01-01T10:00:00+07:00", "data": { "cond": 3 } }"#,
        )
        .unwrap();
        assert_eq!(entry.data.tc, None);
        assert_eq!(entry.data.ws10m, None);
        assert_eq!(entry.data.rain, None);
        assert_eq!(entry.data.cond, Some(3));
    }

    #[test]
    fn empty_envelope_yields_no_entries() {
        let parsed: PlaceResponse = serde_json::from_str(r#"{ "WeatherForecasts": [] }"#).unwrap();
        assert!(parsed.weather_forecasts.is_empty());
    }

    #[test]
    fn unparseable_time_yields_no_timestamp() {
        let entry: UpstreamEntry =
            serde_json::from_str(r#"{ "time": "not a time", "data": {} }"#).unwrap();
        assert_eq!(entry.timestamp(), None);
    }
}
