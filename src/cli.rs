use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::github::api::DEFAULT_API_URL;
use crate::run::{RunParams, DEFAULT_PR_TARGET, DEFAULT_RELEASE_TARGET};
use crate::velocity::{DEFAULT_HISTORY_MONTHS, MAX_HISTORY_MONTHS};
use crate::window::parse_now_override;

#[derive(Parser, Debug)]
#[command(
    name = "github-velocity",
    version,
    about = "Release and merged-PR velocity (R30D, current month, projection) from the GitHub API",
    long_about = None
)]
pub struct Cli {
  /// Repository owner (user or organization)
  #[arg(long, required_unless_present = "gen_man")]
  pub owner: Option<String>,

  /// Repository name
  #[arg(long, required_unless_present = "gen_man")]
  pub repo: Option<String>,

  /// Only count merged PRs authored by this GitHub login (case-insensitive)
  #[arg(long)]
  pub author: Option<String>,

  /// Target releases per month
  #[arg(long, default_value_t = DEFAULT_RELEASE_TARGET)]
  pub release_target: f64,

  /// Target merged PRs per month
  #[arg(long, default_value_t = DEFAULT_PR_TARGET)]
  pub pr_target: f64,

  /// Number of months in the monthly history series (including the current month, at most 1200)
  #[arg(long, default_value_t = DEFAULT_HISTORY_MONTHS)]
  pub history_months: usize,

  /// Print only the JSON result (includes chart series)
  #[arg(long)]
  pub json: bool,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// GitHub token; when absent GITHUB_TOKEN, GH_TOKEN or `gh auth token` are tried
  #[arg(long)]
  pub token: Option<String>,

  /// GitHub API base URL (e.g. https://ghe.example.com/api/v3)
  #[arg(long, default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub owner: String,
  pub repo: String,
  pub author: Option<String>,
  pub release_target: f64,
  pub pr_target: f64,
  pub history_months: usize,
  pub json: bool,
  pub out: String,
  pub token: Option<String>,
  pub api_url: String,
  pub now: Option<DateTime<Utc>>,
}

impl EffectiveConfig {
  pub fn run_params(&self) -> RunParams {
    RunParams {
      owner: self.owner.clone(),
      repo: self.repo.clone(),
      author: self.author.clone(),
      release_target: self.release_target,
      pr_target: self.pr_target,
      history_months: self.history_months,
    }
  }
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn repo_part(flag: &str, value: Option<String>) -> Result<String> {
  let Some(v) = non_blank(value) else {
    bail!("--{} is required", flag)
  };

  if v.contains('/') || v.chars().any(char::is_whitespace) {
    bail!("invalid --{} {:?}: expected a single path segment", flag, v);
  }

  Ok(v)
}

fn target(flag: &str, value: f64) -> Result<f64> {
  if !value.is_finite() || value < 0.0 {
    bail!("invalid --{} {}: expected a non-negative number", flag, value);
  }
  Ok(value)
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let owner = repo_part("owner", cli.owner)?;
  let repo = repo_part("repo", cli.repo)?;

  let release_target = target("release-target", cli.release_target)?;
  let pr_target = target("pr-target", cli.pr_target)?;

  if !(1..=MAX_HISTORY_MONTHS).contains(&cli.history_months) {
    bail!(
      "invalid --history-months {}: expected 1 to {}",
      cli.history_months,
      MAX_HISTORY_MONTHS
    );
  }

  let now = match cli.now_override.as_deref() {
    None => None,
    Some(raw) => match parse_now_override(Some(raw)) {
      Some(dt) => Some(dt),
      None => bail!("invalid --now-override {:?}: expected RFC 3339 or YYYY-MM-DDTHH:MM:SS", raw),
    },
  };

  let api_url = cli.api_url.trim().trim_end_matches('/').to_string();

  if api_url.is_empty() {
    bail!("--api-url must not be empty");
  }

  Ok(EffectiveConfig {
    owner,
    repo,
    author: non_blank(cli.author),
    release_target,
    pr_target,
    history_months: cli.history_months,
    json: cli.json,
    out: cli.out,
    token: non_blank(cli.token),
    api_url,
    now,
  })
}
