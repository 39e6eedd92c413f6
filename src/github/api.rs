// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub endpoints used for velocity (releases, closed pull requests) behind a trait seam
// role: github/api
// inputs: owner/name, API base URL, Transport backend
// outputs: Complete Vec<Event> per collection
// side_effects: Network calls via the configured Transport
// invariants:
// - Releases use next-link pagination; pulls use the page counter with state=closed
// - Every page of a collection is fetched before returning
// errors: FetchError propagated unchanged; callers decide how to report it
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::github::FetchError;
use crate::github::pagination::{LinkPaginator, PageCounterPaginator, Paginator, DEFAULT_PAGE_SIZE};
use crate::github::transport::{Transport, UreqTransport};
use crate::model::Event;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

// --- Trait seam for GitHub API ---
pub trait GithubApi {
  fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Event>, FetchError>;
  /// Closed pull requests, merged or not.
  fn list_closed_pulls(&self, owner: &str, name: &str) -> Result<Vec<Event>, FetchError>;
}

pub struct GithubHttpApi {
  base_url: String,
  transport: Box<dyn Transport>,
  page_size: usize,
}

impl GithubHttpApi {
  pub fn new(base_url: &str, transport: Box<dyn Transport>) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      transport,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  fn repo_url(&self, owner: &str, name: &str, collection: &str) -> String {
    format!("{}/repos/{}/{}/{}", self.base_url, owner, name, collection)
  }
}

impl GithubApi for GithubHttpApi {
  fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Event>, FetchError> {
    let url = self.repo_url(owner, name, "releases");
    LinkPaginator::new(self.page_size).fetch_all(self.transport.as_ref(), &url, &[])
  }

  fn list_closed_pulls(&self, owner: &str, name: &str) -> Result<Vec<Event>, FetchError> {
    let url = self.repo_url(owner, name, "pulls");
    let query = [("state".to_string(), "closed".to_string())];
    PageCounterPaginator::new(self.page_size).fetch_all(self.transport.as_ref(), &url, &query)
  }
}

/// HTTP backend over ureq with an optional bearer token.
pub fn make_http_api(base_url: &str, token: Option<String>) -> Box<dyn GithubApi> {
  Box::new(GithubHttpApi::new(base_url, Box::new(UreqTransport::new(token))))
}
