use serde_json::{json, Value};
use test_support::{MockGithub, MockResponse};

pub const BIN: &str = "github-velocity";
pub const NOW: &str = "2024-06-20T12:00:00Z";

fn body(records: Vec<Value>) -> String {
  Value::Array(records).to_string()
}

fn release(published_at: Option<&str>) -> Value {
  json!({ "tag_name": "v", "draft": published_at.is_none(), "published_at": published_at })
}

fn pull(login: &str, merged_at: Option<&str>) -> Value {
  json!({ "state": "closed", "user": { "login": login }, "merged_at": merged_at })
}

/// Releases over three Link pages (100 + 100 + 37 records).
///
/// Page 3 holds everything recent: June 1, 10, 20 and May 25, 30 of 2024,
/// one unpublished draft, and 31 releases on 2024-01-15.
pub fn release_routes() -> Vec<MockResponse> {
  let old: Vec<Value> = (0..100).map(|_| release(Some("2022-01-10T00:00:00Z"))).collect();

  let mut last = vec![
    release(Some("2024-06-01T09:00:00Z")),
    release(Some("2024-06-10T09:00:00Z")),
    release(Some("2024-06-20T08:00:00Z")),
    release(Some("2024-05-25T00:00:00Z")),
    release(Some("2024-05-30T00:00:00Z")),
    release(None),
  ];
  last.extend((0..31).map(|_| release(Some("2024-01-15T00:00:00Z"))));

  vec![
    MockResponse::json("/repos/acme/widgets/releases", body(old.clone()))
      .with_query(&["per_page=100"])
      .with_next("{base}/repositories/1/releases?per_page=100&page=2"),
    MockResponse::json("/repositories/1/releases", body(old))
      .with_query(&["page=2"])
      .with_next("{base}/repositories/1/releases?per_page=100&page=3"),
    MockResponse::json("/repositories/1/releases", body(last)).with_query(&["page=3"]),
  ]
}

/// Closed pulls over two counter pages (100 + 3 records).
///
/// Page 1: 90 merged in March 2023 by `bot`, 10 closed unmerged by `Octocat`.
/// Page 2: merged June 5 (`Octocat`), June 15 (`octocat`), June 18 (`alice`) of 2024.
pub fn pull_routes() -> Vec<MockResponse> {
  let mut first: Vec<Value> = (0..90).map(|_| pull("bot", Some("2023-03-01T00:00:00Z"))).collect();
  first.extend((0..10).map(|_| pull("Octocat", None)));

  let second = vec![
    pull("Octocat", Some("2024-06-05T00:00:00Z")),
    pull("octocat", Some("2024-06-15T00:00:00Z")),
    pull("alice", Some("2024-06-18T00:00:00Z")),
  ];

  vec![
    MockResponse::json("/repos/acme/widgets/pulls", body(first)).with_query(&["state=closed", "page=1"]),
    MockResponse::json("/repos/acme/widgets/pulls", body(second)).with_query(&["state=closed", "page=2"]),
  ]
}

pub fn fixture_server() -> MockGithub {
  let mut routes = release_routes();
  routes.extend(pull_routes());
  MockGithub::start(routes)
}

/// `github-velocity --owner acme --repo widgets` against `server` at the fixed instant.
pub fn velocity_cmd(server: &MockGithub) -> assert_cmd::Command {
  let mut cmd = test_support::cmd_bin(BIN);
  cmd.args([
    "--owner",
    "acme",
    "--repo",
    "widgets",
    "--api-url",
    server.base_url(),
    "--now-override",
    NOW,
  ]);
  cmd
}

pub fn run_json(cmd: &mut assert_cmd::Command) -> Value {
  let out = cmd.arg("--json").output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}
