// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Discover an optional GitHub credential (env vars, then the `gh` CLI)
// role: github/credentials
// inputs: env GITHUB_TOKEN, env GH_TOKEN; optional `gh` CLI on PATH
// outputs: Option<String> bearer token
// side_effects: Spawns `gh auth token` when no env var is set
// invariants:
// - Precedence: GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`
// - Blank values and failed/empty `gh` output mean no token
// errors: Swallowed; absence of a token means unauthenticated requests
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for key in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(key) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}
