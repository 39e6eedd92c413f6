// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small shared helpers: decimal rounding, the "now" anchor, output writing, man page rendering
// role: utilities/helpers
// inputs: f64 values; optional DateTime override; output target; clap CommandFactory
// outputs: Rounded numbers, a UTC instant, written files, man page text
// side_effects: write_output creates/overwrites the target file when not "-"
// invariants:
// - effective_now is the only place that reads the wall clock
// errors: IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::CommandFactory;

/// Round to `places` decimal places, ties to even on the exact binary value.
///
/// `5.625` is exactly representable and becomes `5.62`; `2.675` is stored just below the
/// tie and becomes `2.67`.
pub fn round_to(value: f64, places: usize) -> f64 {
  if !value.is_finite() {
    return value;
  }
  format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current UTC time is used. Centralizes our handling of test
/// determinism without sprinkling `Utc::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// ISO 8601 with a `+00:00` offset; microseconds only when non-zero.
pub fn iso_utc(dt: DateTime<Utc>) -> String {
  let precision = if dt.timestamp_subsec_micros() == 0 {
    SecondsFormat::Secs
  } else {
    SecondsFormat::Micros
  };
  dt.to_rfc3339_opts(precision, false)
}

/// Write `text` to stdout when `out` is "-", otherwise to the file at `out`.
pub fn write_output(out: &str, text: &str) -> Result<()> {
  if out == "-" {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).context("writing to stdout")?;
    return Ok(());
  }

  std::fs::write(out, text).with_context(|| format!("writing {}", out))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
