//! Maintenance tools for GitHub Container Registry packages.
//!
//! Three small utilities share this library:
//!
//! - `ghcr-prune` deletes untagged container image versions older than the
//!   retention window, driven entirely by `GITHUB_TOKEN` and
//!   `GITHUB_REPOSITORY`.
//! - `tcp-eof-probe` smoke-tests that a local TCP service accepts a
//!   connection and closes it with an immediate EOF.
//! - `tcp-eof-serve` is that service: it closes every accepted connection
//!   immediately.

pub mod config;
pub mod error;
pub mod github;
pub mod output;
pub mod probe;
pub mod prune;
pub mod serve;
