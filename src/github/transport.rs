// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Blocking HTTP GET capability for GitHub collection endpoints (headers, query, Link parsing)
// role: github/transport
// inputs: URL, query pairs, optional bearer token
// outputs: Page values (records + next link) or FetchError
// side_effects: Network calls through a ureq Agent
// invariants:
// - Non-2xx statuses are errors, never empty pages
// - Each request is bounded by REQUEST_TIMEOUT; no retries
// - JSON arrays become records; a lone object is one record; null is no records
// errors: FetchError::{Status, Http, Decode}
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::github::FetchError;
use crate::model::Event;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = "github-velocity";
pub const API_VERSION: &str = "2022-11-28";

/// One response page from a collection endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub records: Vec<Event>,
  /// Target of the `rel="next"` Link relation, when the server sent one.
  pub next: Option<String>,
}

// --- Trait seam for HTTP ---
pub trait Transport {
  fn get(&self, url: &str, query: &[(String, String)]) -> Result<Page, FetchError>;
}

pub struct UreqTransport {
  agent: ureq::Agent,
  token: Option<String>,
}

impl UreqTransport {
  pub fn new(token: Option<String>) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(REQUEST_TIMEOUT))
      .http_status_as_error(false)
      .build()
      .into();

    Self { agent, token }
  }
}

impl Transport for UreqTransport {
  fn get(&self, url: &str, query: &[(String, String)]) -> Result<Page, FetchError> {
    let mut req = self
      .agent
      .get(url)
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", USER_AGENT)
      .header("X-GitHub-Api-Version", API_VERSION);

    if let Some(token) = &self.token {
      req = req.header("Authorization", &format!("Bearer {}", token));
    }

    for (k, v) in query {
      req = req.query(k, v);
    }

    let mut resp = req.call().map_err(|source| FetchError::Http {
      url: url.to_string(),
      source,
    })?;

    if !resp.status().is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: resp.status().as_u16(),
      });
    }

    let next = resp
      .headers()
      .get("link")
      .and_then(|v| v.to_str().ok())
      .and_then(parse_next_link);

    let body = resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
      })?;

    Ok(Page {
      records: records_from_body(body),
      next,
    })
  }
}

/// Normalize a decoded body into a list of records.
pub fn records_from_body(body: serde_json::Value) -> Vec<Event> {
  match body {
    serde_json::Value::Array(items) => items,
    serde_json::Value::Null => Vec::new(),
    other => vec![other],
  }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
  static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]*)>([^<]*)").unwrap());
  static RE_REL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\brel\s*=\s*(?:"([^"]*)"|([^\s;,]+))"#).unwrap());

  for link in RE_LINK.captures_iter(header) {
    let target = link.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    let params = link.get(2).map(|m| m.as_str()).unwrap_or("");

    let is_next = RE_REL.captures_iter(params).any(|rel| {
      rel
        .get(1)
        .or_else(|| rel.get(2))
        .map(|m| m.as_str().split_whitespace().any(|r| r.eq_ignore_ascii_case("next")))
        .unwrap_or(false)
    });

    if is_next && !target.is_empty() {
      return Some(target.to_string());
    }
  }

  None
}
