//! Release and merged pull request velocity from the GitHub REST API.
//!
//! The engine (`window`, `velocity`) is pure: every function takes the "now" anchor as a
//! parameter. Network access lives in `github`; `run` wires both together.

pub mod cli;
pub mod ext;
pub mod github;
pub mod model;
pub mod render;
pub mod run;
pub mod util;
pub mod velocity;
pub mod window;
