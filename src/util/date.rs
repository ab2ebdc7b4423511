use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const COMMON_DATE_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f", // ISO-8601 without offset
  "%Y-%m-%d %H:%M:%S",    // Common format without timezone
  "%Y-%m-%d %H:%M:%S %z", // Common format with timezone
];

/// Parses the timestamp formats seen in job feeds. Timestamps without
/// an offset are taken as UTC.
pub fn parse_date(date_str: impl AsRef<str>) -> Option<DateTime<FixedOffset>> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Some(parsed);
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(date_str) {
    return Some(parsed);
  }

  for fmt in COMMON_DATE_FORMATS {
    if let Ok(parsed) = DateTime::parse_from_str(date_str, fmt) {
      return Some(parsed);
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_str, fmt) {
      return Some(parsed.and_utc().fixed_offset());
    }
  }

  NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|date| date.and_utc().fixed_offset())
}

/// Milliseconds since the epoch, with absent or unparseable dates
/// sorting as epoch zero.
pub fn timestamp_or_epoch(date_str: Option<&str>) -> i64 {
  date_str
    .and_then(parse_date)
    .map(|date| date.timestamp_millis())
    .unwrap_or(0)
}
