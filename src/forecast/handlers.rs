use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::instrument;

use crate::error::ForecastError;
use crate::state::AppState;

use super::dto::{ForecastQuery, ForecastResponse, SlotBatchResponse, SlotForecast, SlotsQuery};
use super::service;
use super::slots::{generate_slots, ICT};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(get_forecast))
        .route("/forecast/slots", get(get_forecast_slots))
}

/// GET /forecast?date=YYYY-MM-DD&time=HH:MM:SS+07:00
#[instrument(skip(state))]
async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ForecastError> {
    let (Some(date), Some(time)) = (params.date, params.time) else {
        return Err(ForecastError::Validation(
            "Missing date or time parameter".into(),
        ));
    };
    let target = parse_target(&date, &time)?;

    let record = service::resolve(
        state.store.as_ref(),
        state.provider.as_ref(),
        state.config.upstream.window_hours,
        target,
    )
    .await?;

    Ok(Json(ForecastResponse::from(&record)))
}

/// GET /forecast/slots?width=60&count=7 — bucket-aligned slots from "now",
/// resolved concurrently with per-slot failure isolation.
#[instrument(skip(state))]
async fn get_forecast_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotsQuery>,
) -> Result<Json<SlotBatchResponse>, ForecastError> {
    if params.width == 0 || params.width > 24 * 60 {
        return Err(ForecastError::Validation(
            "width must be between 1 and 1440 minutes".into(),
        ));
    }
    if params.count == 0 || params.count > 48 {
        return Err(ForecastError::Validation(
            "count must be between 1 and 48".into(),
        ));
    }

    let now = OffsetDateTime::now_utc().to_offset(ICT);
    let slots = generate_slots(params.width, now, params.count);

    let (records, error) = service::resolve_slots(
        state.store.as_ref(),
        state.provider.as_ref(),
        state.config.upstream.window_hours,
        &slots,
    )
    .await;

    let slots = slots
        .into_iter()
        .zip(records)
        .map(|(slot, record)| SlotForecast {
            date: slot.date,
            time: slot.time,
            forecast: record.as_ref().map(ForecastResponse::from),
        })
        .collect();

    Ok(Json(SlotBatchResponse {
        bucket_minutes: params.width,
        slots,
        error,
    }))
}

/// Combine the `date` and `time` parameters into one instant. A literal `+`
/// in the offset arrives as a space after query-string decoding, so it is
/// restored before parsing.
fn parse_target(date: &str, time: &str) -> Result<OffsetDateTime, ForecastError> {
    let time = time.replace(' ', "+");
    let raw = format!("{date}T{time}");
    OffsetDateTime::parse(&raw, &Rfc3339)
        .map_err(|_| ForecastError::Validation(format!("Invalid date or time parameter: {raw}")))
}
