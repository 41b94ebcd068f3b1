//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

/// Errors raised while building run configuration from the environment.
///
/// Every variant is detected before any network activity; the run never
/// starts with a partially valid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable is not set.")]
    MissingToken,

    #[error("GITHUB_REPOSITORY environment variable is not set.")]
    MissingRepository,

    #[error("GITHUB_REPOSITORY must be in the format 'owner/repo', got '{0}'.")]
    MalformedRepository(String),
}
