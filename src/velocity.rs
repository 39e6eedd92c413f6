// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Velocity metrics (R30D, current month, projection, % vs target) and chart series for one event stream
// role: engine/velocity
// inputs: &[Event], timestamp field name, target per month, fixed "now"
// outputs: Velocity, cumulative-by-day series (31 points), monthly history (N points), VelocityReport
// invariants:
// - One "now" per call; every window test in a batch uses it
// - Events with missing/unparsable timestamps are never counted
// - projection is linear: count / days_elapsed * days_in_month, reported to 2 decimals (ties to even)
// - Zero target yields no percentage
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::ext::serde_json::JsonFetch;
use crate::model::{CumulativeDayPoint, Event, MonthlyHistoryPoint, Velocity, VelocityReport};
use crate::util::round_to;
use crate::window::{days_in_month, is_in_month, is_within_last_n_days, previous_month};

/// Trailing window for the R30D count.
pub const R30D_DAYS: i64 = 30;
/// Fixed width of the cumulative series, independent of the month length.
pub const CUMULATIVE_SLOTS: u32 = 31;
pub const DEFAULT_HISTORY_MONTHS: usize = 12;
/// Longest history the CLI accepts (100 years).
pub const MAX_HISTORY_MONTHS: usize = 1200;

fn instants<'a>(events: &'a [Event], field: &'a str) -> impl Iterator<Item = Option<DateTime<FixedOffset>>> + 'a {
  events.iter().map(move |e| e.fetch_instant(field))
}

/// Compute R30D, the current-month count and its month-end projection.
pub fn compute_velocity(events: &[Event], timestamp_field: &str, target_per_month: f64, now: DateTime<Utc>) -> Velocity {
  let (year, month) = (now.year(), now.month());
  let days_in_month = days_in_month(year, month);
  let days_elapsed = now.day();

  let mut r30d = 0u64;
  let mut current_month_count = 0u64;

  for instant in instants(events, timestamp_field) {
    if is_within_last_n_days(instant, R30D_DAYS, now) {
      r30d += 1;
    }
    if is_in_month(instant, year, month) {
      current_month_count += 1;
    }
  }

  let projection = if days_elapsed > 0 {
    (current_month_count as f64 / days_elapsed as f64) * days_in_month as f64
  } else {
    0.0
  };

  // From the unrounded projection; `+ 0.0` folds -0 into 0.
  let projection_vs_target_pct = (target_per_month != 0.0)
    .then(|| ((projection - target_per_month) / target_per_month * 100.0).round_ties_even() + 0.0);

  Velocity {
    r30d,
    current_month_count,
    current_month_projection: round_to(projection, 2),
    days_elapsed,
    days_in_month,
    target_per_month,
    projection_vs_target_pct,
  }
}

/// Running total per day of (year, month), always 31 points.
pub fn cumulative_by_day(events: &[Event], timestamp_field: &str, year: i32, month: u32) -> Vec<CumulativeDayPoint> {
  let mut by_day = [0u64; CUMULATIVE_SLOTS as usize + 1];

  for dt in instants(events, timestamp_field).flatten() {
    if is_in_month(Some(dt), year, month) {
      by_day[dt.day() as usize] += 1;
    }
  }

  let mut cumulative = 0u64;

  (1..=CUMULATIVE_SLOTS)
    .map(|day| {
      cumulative += by_day[day as usize];
      CumulativeDayPoint { day, cumulative }
    })
    .collect()
}

/// Event count per calendar month for the `num_months` months ending at `now`'s month, oldest first.
pub fn monthly_history(
  events: &[Event],
  timestamp_field: &str,
  num_months: usize,
  now: DateTime<Utc>,
) -> Vec<MonthlyHistoryPoint> {
  let mut buckets: HashMap<(i32, u32), u64> = HashMap::new();

  for dt in instants(events, timestamp_field).flatten() {
    *buckets.entry((dt.year(), dt.month())).or_insert(0) += 1;
  }

  let mut out: Vec<MonthlyHistoryPoint> = Vec::new();
  let (mut y, mut m) = (now.year(), now.month());

  for _ in 0..num_months {
    out.push(MonthlyHistoryPoint {
      year: y,
      month: m,
      count: buckets.get(&(y, m)).copied().unwrap_or(0),
    });
    (y, m) = previous_month(y, m);
  }
  out.reverse();

  out
}

/// Velocity plus both chart series for the month containing `now`.
pub fn build_report(
  events: &[Event],
  timestamp_field: &str,
  target_per_month: f64,
  history_months: usize,
  now: DateTime<Utc>,
) -> VelocityReport {
  VelocityReport {
    velocity: compute_velocity(events, timestamp_field, target_per_month, now),
    cumulative_current_month: cumulative_by_day(events, timestamp_field, now.year(), now.month()),
    monthly_history: monthly_history(events, timestamp_field, history_months, now),
  }
}
