use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Admins type schedule times as Moscow wall-clock time. Moscow has been on
/// UTC+03:00 without daylight saving since 2014.
const MOSCOW_OFFSET_HOURS: i64 = 3;

/// Input format shown to admins, `DD.MM.YYYY HH:MM`.
pub const POST_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Interpret a naive wall-clock value as Moscow local time.
pub fn moscow_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(local - Duration::hours(MOSCOW_OFFSET_HOURS)))
}

/// Moscow wall-clock value of an instant.
pub fn utc_to_moscow(dt: &DateTime<Utc>) -> NaiveDateTime {
    dt.naive_utc() + Duration::hours(MOSCOW_OFFSET_HOURS)
}

/// Parse `DD.MM.YYYY HH:MM` (already shape-checked) as Moscow time.
pub fn parse_moscow_datetime(input: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input, POST_DATE_FORMAT)
        .map_err(|e| anyhow!("Not a real date/time '{}': {}", input, e))?;
    Ok(moscow_to_utc(naive))
}

/// Short Moscow-local label used in campaign lists, e.g. `25.12.24 18:00`.
pub fn format_moscow(dt: &DateTime<Utc>) -> String {
    utc_to_moscow(dt).format("%d.%m.%y %H:%M").to_string()
}
