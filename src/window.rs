// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Classify event instants against time windows (last N days, calendar month) and do month arithmetic
// role: engine/windows
// inputs: ISO-8601 strings, a fixed "now" anchor, (year, month) pairs
// outputs: Option<DateTime<FixedOffset>>, booleans, day counts, previous-month cursors
// invariants:
// - Parsing never fails loudly; a None instant matches no window
// - Naive timestamps are UTC
// - "now" is always a parameter; nothing here reads the clock
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 timestamp into an offset-aware instant.
///
/// Accepts RFC 3339 (`2024-06-01T12:00:00Z`, `...+02:00`), naive date-times with `T` or a
/// space separator, and bare dates (midnight). Naive inputs are taken as UTC.
pub fn parse_instant(text: &str) -> Option<DateTime<FixedOffset>> {
  let s = text.trim();

  if s.is_empty() {
    return None;
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt);
  }

  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
    return Some(dt);
  }

  for fmt in NAIVE_FORMATS {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(ndt.and_utc().fixed_offset());
    }
  }

  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|ndt| ndt.and_utc().fixed_offset())
}

/// Whole-day test: `floor((now - instant) / 1 day) <= n`.
///
/// Instants in the future relative to `now` always qualify.
pub fn is_within_last_n_days(instant: Option<DateTime<FixedOffset>>, n: i64, now: DateTime<Utc>) -> bool {
  let Some(dt) = instant else { return false };
  let elapsed = now - dt.with_timezone(&Utc);

  elapsed.num_seconds().div_euclid(SECONDS_PER_DAY) <= n
}

/// Calendar (year, month) match in the instant's own offset.
pub fn is_in_month(instant: Option<DateTime<FixedOffset>>, year: i32, month: u32) -> bool {
  match instant {
    Some(dt) => dt.year() == year && dt.month() == month,
    None => false,
  }
}

/// Number of days in (year, month): the day before the first of the following month.
///
/// Returns 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
  if !(1..=12).contains(&month) {
    return 0;
  }
  let next_y = if month == 12 { year + 1 } else { year };
  let next_m = if month == 12 { 1 } else { month + 1 };

  NaiveDate::from_ymd_opt(next_y, next_m, 1)
    .and_then(|d| d.pred_opt())
    .map(|d| d.day())
    .unwrap_or(0)
}

/// Step a (year, month) cursor back by one month, rolling the year below January.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
  if month <= 1 {
    (year - 1, 12)
  } else {
    (year, month - 1)
  }
}

/// Parse a `--now-override` string into a UTC instant.
/// Accepts anything `parse_instant` does.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(parse_instant).map(|dt| dt.with_timezone(&Utc))
}
