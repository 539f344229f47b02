use serde::Serialize;
use time::{
    format_description::well_known::Rfc3339, macros::offset, Duration, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};

/// Indochina Time. All forecast timestamps are anchored to this offset.
pub const ICT: UtcOffset = offset!(+7);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

/// One discrete point in time a forecast is requested for. Computed fresh on
/// every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub date: SlotDate,
    pub time: String,
}

/// Generate `count` consecutive slots of `bucket_width_minutes` each, starting
/// at the bucket-aligned floor of `reference`. Slots that cross midnight roll
/// over onto the following calendar day.
pub fn generate_slots(
    bucket_width_minutes: u32,
    reference: OffsetDateTime,
    count: usize,
) -> Vec<TimeSlot> {
    assert!(bucket_width_minutes > 0, "bucket width must be positive");

    let minutes_since_midnight =
        u32::from(reference.hour()) * 60 + u32::from(reference.minute());
    let aligned_start = (minutes_since_midnight / bucket_width_minutes) * bucket_width_minutes;

    (0..count)
        .map(|i| {
            let total_minutes = aligned_start + i as u32 * bucket_width_minutes;
            let day_offset = total_minutes / (24 * 60);
            let remainder = total_minutes % (24 * 60);
            let hours = (remainder / 60) as u8;
            let minutes = (remainder % 60) as u8;

            let date = reference
                .date()
                .saturating_add(Duration::days(i64::from(day_offset)));
            let time_of_day =
                Time::from_hms(hours, minutes, 0).expect("derived hour and minute are in range");
            let timestamp =
                PrimitiveDateTime::new(date, time_of_day).assume_offset(reference.offset());

            TimeSlot {
                timestamp,
                date: SlotDate {
                    year: format!("{:04}", date.year()),
                    month: format!("{:02}", u8::from(date.month())),
                    day: format!("{:02}", date.day()),
                },
                time: format!("{hours:02}:{minutes:02}"),
            }
        })
        .collect()
}

pub fn format_timestamp(ts: &OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn slot_zero_is_the_bucket_floor_of_now() {
        let reference = datetime!(2024-01-01 10:07 +7);
        let slots = generate_slots(60, reference, 7);
        assert_eq!(slots.len(), 7);
        assert_eq!(slots[0].time, "10:00");
        assert_eq!(slots[0].timestamp, datetime!(2024-01-01 10:00 +7));
        assert_eq!(
            slots[0].date,
            SlotDate {
                year: "2024".into(),
                month: "01".into(),
                day: "01".into(),
            }
        );
    }

    #[test]
    fn slots_are_bucket_width_apart_and_aligned() {
        let reference = datetime!(2024-06-15 13:52 +7);
        for width in [15u32, 30, 60] {
            let slots = generate_slots(width, reference, 7);
            assert_eq!(u32::from(slots[0].timestamp.minute()) % width, 0);
            for pair in slots.windows(2) {
                assert_eq!(
                    pair[1].timestamp - pair[0].timestamp,
                    Duration::minutes(i64::from(width)),
                    "width {width}"
                );
            }
        }
    }

    #[test]
    fn slots_roll_over_midnight() {
        let reference = datetime!(2024-03-10 23:45 +7);
        let slots = generate_slots(60, reference, 2);
        assert_eq!(slots[0].time, "23:00");
        assert_eq!(slots[0].date.day, "10");
        assert_eq!(slots[1].time, "00:00");
        assert_eq!(slots[1].date.day, "11");
        assert_eq!(slots[1].timestamp, datetime!(2024-03-11 00:00 +7));
    }

    #[test]
    fn rollover_crosses_month_boundary() {
        let reference = datetime!(2024-01-31 23:30 +7);
        let slots = generate_slots(60, reference, 3);
        assert_eq!(slots[0].time, "23:00");
        assert_eq!(slots[0].date.day, "31");
        assert_eq!(slots[1].date.month, "02");
        assert_eq!(slots[1].date.day, "01");
        assert_eq!(slots[1].time, "00:00");
    }

    #[test]
    fn rollover_crosses_year_boundary() {
        let reference = datetime!(2024-12-31 23:50 +7);
        let slots = generate_slots(30, reference, 2);
        assert_eq!(slots[1].timestamp, datetime!(2025-01-01 00:00 +7));
        assert_eq!(slots[1].date.year, "2025");
        assert_eq!(slots[1].date.month, "01");
        assert_eq!(slots[1].date.day, "01");
    }

    #[test]
    fn exact_bucket_boundary_is_its_own_floor() {
        let reference = datetime!(2024-01-01 10:00 +7);
        let slots = generate_slots(60, reference, 1);
        assert_eq!(slots[0].timestamp, reference);
    }

    #[test]
    fn slots_keep_the_reference_offset() {
        let reference = datetime!(2024-01-01 10:07 +7);
        let slots = generate_slots(15, reference, 4);
        for slot in &slots {
            assert_eq!(slot.timestamp.offset(), ICT);
        }
    }

    #[test]
    #[should_panic(expected = "bucket width must be positive")]
    fn zero_width_is_a_precondition_violation() {
        generate_slots(0, datetime!(2024-01-01 10:07 +7), 1);
    }

    #[test]
    fn format_timestamp_is_rfc3339_with_offset() {
        let ts = datetime!(2024-01-01 10:00 +7);
        assert_eq!(format_timestamp(&ts), "2024-01-01T10:00:00+07:00");
    }
}
