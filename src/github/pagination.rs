// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch every page of a GitHub collection endpoint (next-link or page-counter style)
// role: github/pagination
// inputs: Transport, collection URL, query pairs
// outputs: One ordered Vec<Event> concatenating all pages in server order
// side_effects: One Transport::get per page, sequential
// invariants:
// - per_page is always sent explicitly (DEFAULT_PAGE_SIZE unless the caller set one)
// - Any page error aborts the whole fetch; no partial Ok
// - Link style stops when a page carries no next link
// - Counter style stops on an empty page or a short page
// errors: FetchError from the transport, unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::github::FetchError;
use crate::github::transport::Transport;
use crate::model::Event;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Strategy for walking a paginated collection.
pub trait Paginator {
  fn fetch_all(&self, transport: &dyn Transport, url: &str, query: &[(String, String)]) -> Result<Vec<Event>, FetchError>;
}

/// Follows the `rel="next"` Link header until the server stops sending one.
#[derive(Debug, Clone, Copy)]
pub struct LinkPaginator {
  page_size: usize,
}

/// Requests `page=1,2,...` until a page comes back empty or short.
#[derive(Debug, Clone, Copy)]
pub struct PageCounterPaginator {
  page_size: usize,
}

impl LinkPaginator {
  pub fn new(page_size: usize) -> Self {
    Self {
      page_size: page_size.max(1),
    }
  }
}

impl Default for LinkPaginator {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_SIZE)
  }
}

impl PageCounterPaginator {
  pub fn new(page_size: usize) -> Self {
    Self {
      page_size: page_size.max(1),
    }
  }
}

impl Default for PageCounterPaginator {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_SIZE)
  }
}

/// Copy `query`, adding `per_page` unless the caller already chose one.
/// Returns the effective page size alongside the params.
fn with_page_size(query: &[(String, String)], default_size: usize) -> (Vec<(String, String)>, usize) {
  let mut params = query.to_vec();

  let explicit = params
    .iter()
    .find(|(k, _)| k == "per_page")
    .and_then(|(_, v)| v.parse::<usize>().ok())
    .filter(|n| *n > 0);

  match explicit {
    Some(n) => (params, n),
    None => {
      params.retain(|(k, _)| k != "per_page");
      params.push(("per_page".to_string(), default_size.to_string()));
      (params, default_size)
    }
  }
}

impl Paginator for LinkPaginator {
  fn fetch_all(&self, transport: &dyn Transport, url: &str, query: &[(String, String)]) -> Result<Vec<Event>, FetchError> {
    let (first_params, _) = with_page_size(query, self.page_size);
    let mut out: Vec<Event> = Vec::new();
    let mut next = Some(url.to_string());
    let mut page_no = 0usize;

    while let Some(current) = next.take() {
      page_no += 1;
      // The next link already carries the query.
      let params: &[(String, String)] = if page_no == 1 { &first_params[..] } else { &[] };
      let page = transport.get(&current, params)?;

      debug!(url = %current, page = page_no, records = page.records.len(), "fetched page (link)");

      out.extend(page.records);
      next = page.next;
    }

    Ok(out)
  }
}

impl Paginator for PageCounterPaginator {
  fn fetch_all(&self, transport: &dyn Transport, url: &str, query: &[(String, String)]) -> Result<Vec<Event>, FetchError> {
    let (base_params, page_size) = with_page_size(query, self.page_size);
    let mut out: Vec<Event> = Vec::new();
    let mut page_no = 1usize;

    loop {
      let mut params = base_params.clone();
      params.retain(|(k, _)| k != "page");
      params.push(("page".to_string(), page_no.to_string()));

      let page = transport.get(url, &params)?;
      let n = page.records.len();

      debug!(url = %url, page = page_no, records = n, "fetched page (counter)");

      if n == 0 {
        break;
      }
      out.extend(page.records);
      if n < page_size {
        break;
      }
      page_no += 1;
    }

    Ok(out)
  }
}
