//! Run configuration for `ghcr-prune`.
//!
//! Construction fails closed: every required environment variable is
//! validated here, before any network activity.

use anyhow::Result;

use crate::error::ConfigError;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Environment variable overriding the API base (GHES, tests).
pub const API_BASE_ENV: &str = "GITHUB_API_URL";

/// Validated configuration for a prune run.
#[derive(Debug, Clone)]
pub struct PruneConfig {
    /// Bearer token with the `packages` scope.
    pub token: String,
    /// Account the container package is published under.
    pub owner: String,
    /// Container package name; equals the repository name.
    pub package: String,
    /// API base URL, no trailing slash.
    pub api_base: String,
}

impl PruneConfig {
    /// Build configuration from `GITHUB_TOKEN` and `GITHUB_REPOSITORY`.
    ///
    /// The repository is split on the first `/`; the package name equals
    /// the repository part.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either variable is missing or the
    /// repository is not in `owner/repo` form.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();
        if token.is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        let repository = std::env::var("GITHUB_REPOSITORY").unwrap_or_default();
        if repository.is_empty() {
            return Err(ConfigError::MissingRepository.into());
        }
        let Some((owner, repo_name)) = repository.split_once('/') else {
            return Err(ConfigError::MalformedRepository(repository).into());
        };
        if owner.is_empty() || repo_name.is_empty() {
            return Err(ConfigError::MalformedRepository(repository.clone()).into());
        }

        let api_base = std::env::var(API_BASE_ENV)
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token,
            owner: owner.to_string(),
            package: repo_name.to_string(),
            api_base,
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_env(token: Option<&str>, repository: Option<&str>, api_base: Option<&str>) {
        // SAFETY: serialized by #[serial]
        unsafe {
            match token {
                Some(v) => std::env::set_var("GITHUB_TOKEN", v),
                None => std::env::remove_var("GITHUB_TOKEN"),
            }
            match repository {
                Some(v) => std::env::set_var("GITHUB_REPOSITORY", v),
                None => std::env::remove_var("GITHUB_REPOSITORY"),
            }
            match api_base {
                Some(v) => std::env::set_var(API_BASE_ENV, v),
                None => std::env::remove_var(API_BASE_ENV),
            }
        }
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_missing_token_fails() {
        set_env(None, Some("acme/widget"), None);
        let err = PruneConfig::from_env().unwrap_err().to_string();
        assert!(err.contains("GITHUB_TOKEN"), "got: {err}");
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_empty_token_fails() {
        set_env(Some(""), Some("acme/widget"), None);
        assert!(PruneConfig::from_env().is_err());
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_missing_repository_fails() {
        set_env(Some("t0ken"), None, None);
        let err = PruneConfig::from_env().unwrap_err().to_string();
        assert!(err.contains("GITHUB_REPOSITORY"), "got: {err}");
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_repository_without_separator_fails() {
        set_env(Some("t0ken"), Some("acme-widget"), None);
        let err = PruneConfig::from_env().unwrap_err().to_string();
        assert!(err.contains("owner/repo"), "got: {err}");
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_repository_with_empty_owner_fails() {
        set_env(Some("t0ken"), Some("/widget"), None);
        assert!(PruneConfig::from_env().is_err());
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_splits_on_first_separator() {
        set_env(Some("t0ken"), Some("acme/widget/legacy"), None);
        let cfg = PruneConfig::from_env().unwrap();
        assert_eq!(cfg.owner, "acme");
        assert_eq!(cfg.package, "widget/legacy");
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_defaults_api_base() {
        set_env(Some("t0ken"), Some("acme/widget"), None);
        let cfg = PruneConfig::from_env().unwrap();
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    #[serial(prune_env)]
    fn test_from_env_api_base_override_trims_trailing_slash() {
        set_env(Some("t0ken"), Some("acme/widget"), Some("http://127.0.0.1:4100/"));
        let cfg = PruneConfig::from_env().unwrap();
        assert_eq!(cfg.api_base, "http://127.0.0.1:4100");
        set_env(None, None, None);
    }
}
