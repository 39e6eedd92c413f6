// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failures for GitHub collection fetches (status, transport, decoding)
// role: github/errors
// outputs: FetchError carried through Transport, Paginator and GithubApi results
// invariants: Every variant names the URL that failed; no variant is recoverable inside the fetch layer
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
  /// Server answered with a non-2xx status.
  #[error("GET {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// Connection, TLS or timeout failure before a status was available.
  #[error("GET {url} failed: {source}")]
  Http {
    url: String,
    #[source]
    source: ureq::Error,
  },

  /// Body could not be decoded as JSON.
  #[error("GET {url} returned an undecodable body: {message}")]
  Decode { url: String, message: String },
}

impl FetchError {
  pub fn url(&self) -> &str {
    match self {
      FetchError::Status { url, .. } | FetchError::Http { url, .. } | FetchError::Decode { url, .. } => url,
    }
  }

  /// HTTP status when the server produced one.
  pub fn status(&self) -> Option<u16> {
    match self {
      FetchError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}
