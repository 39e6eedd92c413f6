// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the GitHub REST integration (transport, pagination, endpoints, credentials)
// role: github/namespace
// outputs: Public submodules and the FetchError type
// invariants: Network access is isolated here; the velocity engine never performs I/O
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod error;
pub mod pagination;
pub mod token;
pub mod transport;

pub use error::FetchError;
