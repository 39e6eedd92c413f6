// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render a RunResult as pretty JSON or as the short human-readable velocity summary
// role: output/render
// inputs: &RunResult
// outputs: String (JSON or text); never writes by itself
// invariants:
// - JSON is the full RunResult including chart series
// - Text shows target, R30D, current month, projection and the signed % only when present
// errors: JSON serialization errors bubble via anyhow
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write;

use anyhow::Result;

use crate::model::{RunResult, VelocityReport};

const RULE_WIDTH: usize = 60;

pub fn render_json(result: &RunResult) -> Result<String> {
  let mut s = serde_json::to_string_pretty(result)?;
  s.push('\n');
  Ok(s)
}

/// Shortest float form, keeping one decimal for whole numbers (`2.0`, `4.5`, `10.33`).
fn fmt_number(v: f64) -> String {
  if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
    format!("{:.1}", v)
  } else {
    format!("{}", v)
  }
}

fn push_stream(out: &mut String, title: &str, report: &VelocityReport) {
  let v = &report.velocity;

  let _ = writeln!(out, "{}", title);
  let _ = write!(
    out,
    "  Target: {}  |  R30D: {}  |  Current month: {}  |  Projection: {}",
    fmt_number(v.target_per_month),
    v.r30d,
    v.current_month_count,
    fmt_number(v.current_month_projection)
  );

  match v.projection_vs_target_pct {
    Some(pct) => {
      let _ = writeln!(out, "  ({:+.0}% vs target)", pct);
    }
    None => out.push('\n'),
  }
}

pub fn render_text(result: &RunResult) -> String {
  let mut out = String::new();

  let _ = write!(out, "Velocity for {}", result.repo);
  if let Some(author) = &result.author_filter {
    let _ = write!(out, " (PR author: {})", author);
  }
  out.push('\n');
  let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

  push_stream(&mut out, "RELEASES", &result.releases);
  out.push('\n');
  push_stream(&mut out, "PR MERGES", &result.pr_merges);
  out.push('\n');
  out.push_str("(Full JSON for charts: run with --json)\n");

  out
}
