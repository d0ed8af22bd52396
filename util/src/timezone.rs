//! Conversions between the storage timezone (UTC) and the facility's fixed
//! local timezone (UTC+7).
//!
//! Timestamps are persisted as UTC instants; calendar dates and displayed
//! times are local. Naive datetimes coming in over the wire are taken to
//! already be UTC and get the UTC zone attached without offset math, while
//! local conversions apply the +07:00 offset. Duration math downstream
//! relies on that distinction.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const OFFSET_HOURS: i32 = 7;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(OFFSET_HOURS * 3600).expect("static +07:00 offset")
}

/// Converts a UTC instant into facility-local wall time.
pub fn to_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&offset())
}

/// Interprets a zone-less datetime as a UTC instant. No offset is applied.
pub fn naive_as_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// Converts any zone-aware datetime to UTC.
pub fn to_utc(aware: DateTime<FixedOffset>) -> DateTime<Utc> {
    aware.with_timezone(&Utc)
}

/// Current facility-local wall time.
pub fn now_local() -> DateTime<FixedOffset> {
    to_local(Utc::now())
}

/// Today's calendar date at the facility.
pub fn local_today() -> NaiveDate {
    now_local().date_naive()
}

/// The current facility-local year.
pub fn local_year() -> i32 {
    now_local().year()
}

/// Current facility-local time of day as `HH:MM:SS`.
pub fn local_time_of_day_string() -> String {
    now_local().format("%H:%M:%S").to_string()
}

/// Inclusive UTC bounds of one facility-local calendar day.
///
/// Mirrors a `[00:00:00, 23:59:59.999999]` local range, shifted to UTC for
/// range filters over stored instants.
pub fn local_day_bounds_utc(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_local = offset()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .expect("fixed offset has no DST gaps");
    let end_time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).expect("static time");
    let end_local = offset()
        .from_local_datetime(&date.and_time(end_time))
        .single()
        .expect("fixed offset has no DST gaps");
    (to_utc(start_local), to_utc(end_local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn local_conversion_applies_offset() {
        let utc = Utc.with_ymd_and_hms(2026, 1, 10, 20, 30, 0).unwrap();
        let local = to_local(utc);
        assert_eq!(local.to_rfc3339(), "2026-01-11T03:30:00+07:00");
    }

    #[test]
    fn naive_input_is_treated_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let instant = naive_as_utc(naive);
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_span_the_local_day_in_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        let (start, end) = local_day_bounds_utc(date);
        // Local midnight is 17:00 UTC of the previous day.
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 10, 17, 0, 0).unwrap());
        assert!(end > start);
        assert_eq!(to_local(start).date_naive(), date);
        assert_eq!(to_local(end).date_naive(), date);
    }
}
