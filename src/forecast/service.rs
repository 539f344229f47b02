use futures::future::join_all;
use time::OffsetDateTime;

use crate::error::ForecastError;
use crate::forecast::repo::{ForecastRecord, ForecastStore};
use crate::forecast::slots::{format_timestamp, TimeSlot, ICT};
use crate::forecast::upstream::{ForecastProvider, UpstreamEntry};

/// Resolve one timestamp through the read-through cache: return the stored
/// record if present, otherwise fetch a window from the provider, pick the
/// entry at exactly `target`, cache it and return it.
///
/// The upsert is best-effort: the fetched value is returned even when
/// persisting it fails.
pub async fn resolve(
    store: &dyn ForecastStore,
    provider: &dyn ForecastProvider,
    window_hours: u8,
    target: OffsetDateTime,
) -> Result<ForecastRecord, ForecastError> {
    if let Some(record) = store.get(target).await? {
        return Ok(record);
    }

    // The provider's date/hour parameters are in Thai local time.
    let local = target.to_offset(ICT);
    let entries = provider
        .fetch_window(local.date(), local.hour(), window_hours)
        .await?;

    let matched = entries
        .into_iter()
        .find(|entry| entry.timestamp() == Some(target))
        .ok_or_else(|| ForecastError::NotFound(format_timestamp(&target)))?;

    let record = normalize(target, &matched);
    if let Err(e) = store.upsert(&record).await {
        tracing::warn!(
            error = %e,
            target = %format_timestamp(&target),
            "failed to cache forecast, returning fetched value",
        );
    }
    Ok(record)
}

/// Resolve every slot concurrently. Failed slots come back as `None`; the
/// first failure message is surfaced alongside the partial results.
pub async fn resolve_slots(
    store: &dyn ForecastStore,
    provider: &dyn ForecastProvider,
    window_hours: u8,
    slots: &[TimeSlot],
) -> (Vec<Option<ForecastRecord>>, Option<String>) {
    let results = join_all(
        slots
            .iter()
            .map(|slot| resolve(store, provider, window_hours, slot.timestamp)),
    )
    .await;

    let mut first_error = None;
    let records = results
        .into_iter()
        .zip(slots)
        .map(|(result, slot)| match result {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, slot = %slot.time, "slot resolution failed");
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
                None
            }
        })
        .collect();

    (records, first_error)
}

fn normalize(target: OffsetDateTime, entry: &UpstreamEntry) -> ForecastRecord {
    ForecastRecord {
        ts: target,
        temperature: entry.data.tc,
        cond: entry.data.cond,
        ws10m: entry.data.ws10m,
        rain: entry.data.rain.unwrap_or(0.0),
    }
}
