// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (velocity, series points, run result) shared by the engine and rendering
// role: model/types
// outputs: Serializable structs with stable snake_case field names consumed by dashboards
// invariants:
// - projection_vs_target_pct serializes as null (never omitted, never 0) when the target is zero
// - cumulative_current_month has exactly 31 points; monthly_history is ascending and gap-free
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// A raw release or pull request record as returned by the GitHub API.
pub type Event = serde_json::Value;

/// Timestamp field consulted for releases.
pub const RELEASE_TIMESTAMP_FIELD: &str = "published_at";
/// Timestamp field consulted for pull requests.
pub const MERGE_TIMESTAMP_FIELD: &str = "merged_at";
/// Dotted path of the pull request author login.
pub const AUTHOR_LOGIN_FIELD: &str = "user.login";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Velocity {
  pub r30d: u64,
  pub current_month_count: u64,
  pub current_month_projection: f64,
  pub days_elapsed: u32,
  pub days_in_month: u32,
  pub target_per_month: f64,
  pub projection_vs_target_pct: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeDayPoint {
  pub day: u32,
  pub cumulative: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyHistoryPoint {
  pub year: i32,
  pub month: u32,
  pub count: u64,
}

/// Velocity for one stream plus its chart series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VelocityReport {
  #[serde(flatten)]
  pub velocity: Velocity,
  pub cumulative_current_month: Vec<CumulativeDayPoint>,
  pub monthly_history: Vec<MonthlyHistoryPoint>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RunResult {
  /// `owner/name`
  pub repo: String,
  pub author_filter: Option<String>,
  pub as_of: String,
  pub releases: VelocityReport,
  pub pr_merges: VelocityReport,
}
