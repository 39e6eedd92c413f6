// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one velocity run: fetch releases and closed PRs, keep merged (optionally by author), compute reports
// role: orchestration/run
// inputs: RunParams, a GithubApi backend, a fixed "now"
// outputs: RunResult (repo, author filter, as_of, releases + pr_merges VelocityReports)
// side_effects: Network calls through the GithubApi backend (releases first, then pulls)
// invariants:
// - Closed-but-unmerged PRs (merged_at missing/null) are dropped before any counting
// - Author filter compares user.login case-insensitively
// - A fetch failure on either stream aborts the run; no partial RunResult
// errors: anyhow with context naming the failing stream
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::ext::serde_json::JsonFetch;
use crate::github::api::{make_http_api, GithubApi, DEFAULT_API_URL};
use crate::model::{Event, RunResult, AUTHOR_LOGIN_FIELD, MERGE_TIMESTAMP_FIELD, RELEASE_TIMESTAMP_FIELD};
use crate::util::{effective_now, iso_utc};
use crate::velocity::{build_report, DEFAULT_HISTORY_MONTHS};

pub const DEFAULT_RELEASE_TARGET: f64 = 2.0;
pub const DEFAULT_PR_TARGET: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
  pub owner: String,
  pub repo: String,
  pub author: Option<String>,
  pub release_target: f64,
  pub pr_target: f64,
  pub history_months: usize,
}

impl RunParams {
  pub fn new(owner: &str, repo: &str) -> Self {
    Self {
      owner: owner.to_string(),
      repo: repo.to_string(),
      author: None,
      release_target: DEFAULT_RELEASE_TARGET,
      pr_target: DEFAULT_PR_TARGET,
      history_months: DEFAULT_HISTORY_MONTHS,
    }
  }
}

/// Keep pull requests that carry a merge timestamp.
pub fn merged_pulls(pulls: Vec<Event>) -> Vec<Event> {
  pulls
    .into_iter()
    .filter(|p| p.fetch(MERGE_TIMESTAMP_FIELD).as_str().is_some_and(|s| !s.is_empty()))
    .collect()
}

/// Keep pull requests whose author login equals `login`, ignoring case.
pub fn filter_by_author(pulls: Vec<Event>, login: &str) -> Vec<Event> {
  let wanted = login.to_lowercase();

  pulls
    .into_iter()
    .filter(|p| {
      p.fetch(AUTHOR_LOGIN_FIELD)
        .as_str()
        .is_some_and(|l| l.to_lowercase() == wanted)
    })
    .collect()
}

/// Run against an injected backend with a fixed `now`.
pub fn run(params: &RunParams, api: &dyn GithubApi, now: DateTime<Utc>) -> Result<RunResult> {
  let repo = format!("{}/{}", params.owner, params.repo);

  // Phase 1: fetch both streams, releases first
  let releases = api
    .list_releases(&params.owner, &params.repo)
    .with_context(|| format!("fetching releases for {}", repo))?;

  let closed = api
    .list_closed_pulls(&params.owner, &params.repo)
    .with_context(|| format!("fetching pull requests for {}", repo))?;

  // Phase 2: merged only, then the optional author filter
  let closed_count = closed.len();
  let mut pulls = merged_pulls(closed);
  let merged_count = pulls.len();

  if let Some(author) = params.author.as_deref() {
    pulls = filter_by_author(pulls, author);
  }

  info!(
    repo = %repo,
    releases = releases.len(),
    closed_pulls = closed_count,
    merged_pulls = merged_count,
    counted_pulls = pulls.len(),
    "fetched event streams"
  );

  // Phase 3: one report per stream, same anchor
  let release_report = build_report(
    &releases,
    RELEASE_TIMESTAMP_FIELD,
    params.release_target,
    params.history_months,
    now,
  );
  let pr_report = build_report(
    &pulls,
    MERGE_TIMESTAMP_FIELD,
    params.pr_target,
    params.history_months,
    now,
  );

  Ok(RunResult {
    repo,
    author_filter: params.author.clone(),
    as_of: iso_utc(now),
    releases: release_report,
    pr_merges: pr_report,
  })
}

/// Run over HTTP against `api_url` with an optional token; `now` defaults to the wall clock.
pub fn run_with_token(
  params: &RunParams,
  api_url: Option<&str>,
  token: Option<String>,
  now_override: Option<DateTime<Utc>>,
) -> Result<RunResult> {
  let api = make_http_api(api_url.unwrap_or(DEFAULT_API_URL), token);
  run(params, api.as_ref(), effective_now(now_override))
}
