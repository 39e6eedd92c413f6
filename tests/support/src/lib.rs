//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Then in tests:
//! ```rust,no_run
//! use test_support::{init_tracing, MockGithub, MockResponse};
//!
//! init_tracing();
//! let server = MockGithub::start(vec![MockResponse::json("/repos/o/r/releases", "[]")]);
//! let _url = server.base_url();
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::env;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Initialize insta snapshot settings once per test process.
///
/// - Omits `Expression:` in snapshot headers for cleaner diffs
pub fn init_insta() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let mut settings = insta::Settings::clone_current();
        settings.set_omit_expression(true);
        // Bind settings to the thread for the remainder of the test process by leaking the guard
        let guard = settings.bind_to_scope();
        std::mem::forget(guard);
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests` directory.
pub fn tests_dir() -> PathBuf {
    // Manifest dir is <repo>/tests/support; parent() is <repo>/tests
    let support = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    support.parent().map(Path::to_path_buf).unwrap_or(support)
}

/// Read a JSON file under `tests/` (e.g. `schemas/x.json`).
pub fn read_tests_json(rel_path: &str) -> serde_json::Value {
    let path = tests_dir().join(rel_path);
    let data = std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_slice(&data).unwrap_or_else(|e| panic!("failed to parse JSON {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Set multiple environment variables for the duration of the returned guard.
pub fn with_env(vars: &[(&str, &str)]) -> EnvGuard {
    EnvGuard::set_many(vars)
}

/// Unset environment variables for the duration of the returned guard.
pub fn without_env(keys: &[&str]) -> EnvGuard {
    EnvGuard::unset_many(keys)
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
///
/// The command runs with a fixed dummy token so credential discovery never shells out to `gh`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
    cmd.env("GITHUB_TOKEN", "test-token").env_remove("GH_TOKEN").env_remove("RUST_LOG");
    cmd
}

/// Guard for temporarily setting or unsetting environment variables.
///
/// Previous values are restored on drop, including when a test assertion panics.
pub struct EnvGuard {
    prev: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set_many(kv: &[(&str, &str)]) -> Self {
        let mut prev = Vec::with_capacity(kv.len());
        for (k, v) in kv {
            prev.push((k.to_string(), env::var(k).ok()));
            env::set_var(k, v);
        }
        Self { prev }
    }

    pub fn unset_many(keys: &[&str]) -> Self {
        let mut prev = Vec::with_capacity(keys.len());
        for k in keys {
            prev.push((k.to_string(), env::var(k).ok()));
            env::remove_var(k);
        }
        Self { prev }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore in reverse so overlapping keys end at their oldest value.
        for (k, old) in self.prev.drain(..).rev() {
            match old {
                Some(v) => env::set_var(&k, v),
                None => env::remove_var(&k),
            }
        }
    }
}

// --- Scripted GitHub API server ---

/// One canned response, matched by path plus a set of `k=v` query pairs.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub path: String,
    pub query: Vec<String>,
    pub status: u16,
    pub body: String,
    /// `Link` header value; `{base}` is replaced with the server base URL.
    pub link: Option<String>,
}

impl MockResponse {
    pub fn json(path: &str, body: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            query: Vec::new(),
            status: 200,
            body: body.into(),
            link: None,
        }
    }

    pub fn with_query(mut self, pairs: &[&str]) -> Self {
        self.query = pairs.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.link = Some(format!("<{}>; rel=\"next\"", next));
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    fn matches(&self, path: &str, query: &str) -> bool {
        let pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
        self.path == path && self.query.iter().all(|q| pairs.contains(&q.as_str()))
    }
}

/// Minimal HTTP/1.1 server on 127.0.0.1 replaying `MockResponse`s; one request per connection.
pub struct MockGithub {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockGithub {
    pub fn start(routes: Vec<MockResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let routes: Vec<MockResponse> = routes
            .into_iter()
            .map(|mut r| {
                r.link = r.link.map(|l| l.replace("{base}", &base_url));
                r
            })
            .collect();

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                handle(stream, &routes, &log);
            }
        });

        Self { base_url, requests }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request targets (`/path?query`) in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|raw| raw.split_whitespace().nth(1).map(|s| s.to_string()))
            .collect()
    }

    /// Raw request heads in arrival order.
    pub fn raw_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_head(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(mut stream: TcpStream, routes: &[MockResponse], log: &Mutex<Vec<String>>) {
    let head = read_head(&mut stream);
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    log.lock().unwrap().push(head);

    let (path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));
    let fallback = MockResponse::json(path, r#"{"message":"Not Found"}"#).with_status(404);
    let route = routes.iter().find(|r| r.matches(path, query)).unwrap_or(&fallback);

    let link = route
        .link
        .as_ref()
        .map(|l| format!("Link: {}\r\n", l))
        .unwrap_or_default();
    let resp = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        route.status,
        reason(route.status),
        route.body.len(),
        link,
        route.body
    );
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let _ = stream.write_all(resp.as_bytes());
    let _ = stream.flush();
}
