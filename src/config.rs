use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub token: String,
    pub province: String,
    /// How many hours of forecast one provider call covers.
    pub window_hours: u8,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let upstream = UpstreamConfig {
            base_url: std::env::var("TMD_API_URL")
                .unwrap_or_else(|_| "https://data.tmd.go.th/nwpapi/v1".into()),
            token: std::env::var("TMD_API_TOKEN")?,
            province: std::env::var("WEATHER_PROVINCE").unwrap_or_else(|_| "กาฬสินธุ์".into()),
            window_hours: std::env::var("FORECAST_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse::<u8>().ok())
                .unwrap_or(3),
            timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database_url,
            upstream,
        })
    }
}
