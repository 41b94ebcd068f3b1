//! GitHub Packages REST client for container package versions.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::PruneConfig;

/// Page size for the versions listing endpoint.
pub const PER_PAGE: usize = 100;

// ── Data model ───────────────────────────────────────────────────────────────

/// One stored package version, as returned by the registry.
///
/// Read-only: the tools never construct or mutate one on the registry side,
/// only delete by identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageVersion {
    /// Registry-assigned identifier, treated as opaque.
    pub id: u64,
    /// Creation timestamp (UTC, `Z`-suffixed on the wire).
    pub created_at: DateTime<Utc>,
    /// Container metadata; absent for some older versions.
    #[serde(default)]
    pub metadata: VersionMetadata,
}

impl PackageVersion {
    /// Tags pointing at this version. Empty for intermediate build
    /// artifacts.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.metadata.container.tags
    }
}

/// `metadata` object of a package version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionMetadata {
    #[serde(default)]
    pub container: ContainerVersionMetadata,
}

/// `metadata.container` object of a package version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerVersionMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

// ── Port ─────────────────────────────────────────────────────────────────────

/// Versions API the prune use-case consumes.
///
/// Implemented by [`PackagesClient`]; mocked in unit tests.
#[cfg_attr(test, mockall::automock)]
pub trait PackagesApi {
    /// Fetch one page (1-based) of up to [`PER_PAGE`] version records.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status or transport failure.
    fn list_page(&self, page: u32) -> Result<Vec<PackageVersion>>;

    /// Delete a version by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status or transport failure.
    fn delete_version(&self, id: u64) -> Result<()>;
}

// ── Production client ────────────────────────────────────────────────────────

/// Client for the GitHub Packages REST API.
pub struct PackagesClient {
    api_base: String,
    token: String,
    owner: String,
    package: String,
}

impl PackagesClient {
    #[must_use]
    pub fn new(cfg: &PruneConfig) -> Self {
        Self {
            api_base: cfg.api_base.clone(),
            token: cfg.token.clone(),
            owner: cfg.owner.clone(),
            package: cfg.package.clone(),
        }
    }

    fn versions_url(&self) -> String {
        format!(
            "{}/users/{}/packages/container/{}/versions",
            self.api_base, self.owner, self.package
        )
    }

    fn with_headers(&self, req: ureq::Request) -> ureq::Request {
        req.set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
            .set("User-Agent", "ghcr-prune")
    }
}

impl PackagesApi for PackagesClient {
    fn list_page(&self, page: u32) -> Result<Vec<PackageVersion>> {
        let url = format!("{}?per_page={PER_PAGE}&page={page}", self.versions_url());
        let resp = match self.with_headers(ureq::get(&url)).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                anyhow::bail!("HTTP {code} for GET {url}: {}", resp.status_text())
            }
            Err(e) => return Err(e).with_context(|| format!("GET {url}")),
        };
        let body = resp
            .into_string()
            .with_context(|| format!("reading response for GET {url}"))?;
        serde_json::from_str(&body).with_context(|| format!("parsing response for GET {url}"))
    }

    fn delete_version(&self, id: u64) -> Result<()> {
        let url = format!("{}/{id}", self.versions_url());
        match self.with_headers(ureq::delete(&url)).call() {
            // Success is an empty 204 acknowledgment.
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => {
                anyhow::bail!("HTTP {code} for DELETE {url}: {}", resp.status_text())
            }
            Err(e) => Err(e).with_context(|| format!("DELETE {url}")),
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
