//! Cleanup use-case: fetch every version, delete the eligible ones.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use crate::github::{PER_PAGE, PackageVersion, PackagesApi};
use crate::output::OutputContext;

/// Retention window. The console summary says "2 years"; the cutoff is the
/// literal 730-day duration, not calendar years.
pub const RETENTION_DAYS: i64 = 2 * 365;

/// Counts reported at the end of a prune run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneSummary {
    /// Version records fetched across all pages.
    pub fetched: usize,
    /// Versions deleted this run.
    pub deleted: usize,
}

/// Fetch every version of the package, page by page.
///
/// Pages are concatenated in request order; fetching stops at the first
/// page that is empty or shorter than [`PER_PAGE`].
///
/// # Errors
///
/// Returns the first listing error; no partial result is kept.
pub fn fetch_all_versions(api: &impl PackagesApi) -> Result<Vec<PackageVersion>> {
    let mut versions = Vec::new();
    let mut page = 1;
    loop {
        let page_data = api.list_page(page)?;
        let fetched = page_data.len();
        versions.extend(page_data);
        if fetched < PER_PAGE {
            break;
        }
        page += 1;
    }
    Ok(versions)
}

/// A version is eligible for deletion iff it has no tags and was created
/// strictly before the cutoff. Tagged versions are never eligible,
/// regardless of age.
#[must_use]
pub fn is_eligible(version: &PackageVersion, cutoff: DateTime<Utc>) -> bool {
    version.tags().is_empty() && version.created_at < cutoff
}

/// Run the full cleanup against one container package.
///
/// Fail-fast: the first listing or delete error aborts the run with no
/// partial-failure bookkeeping.
///
/// # Errors
///
/// Propagates any listing or delete failure.
pub fn run(
    api: &impl PackagesApi,
    ctx: &OutputContext,
    owner: &str,
    package: &str,
) -> Result<PruneSummary> {
    let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);

    ctx.info(&format!("Fetching versions for {owner}/{package}..."));
    let versions = fetch_all_versions(api)?;
    ctx.info(&format!("Found {} total version(s).", versions.len()));

    let mut deleted = 0;
    for version in &versions {
        if !is_eligible(version, cutoff) {
            continue;
        }
        ctx.info(&format!(
            "Deleting untagged version {} (created {})...",
            version.id,
            version.created_at.date_naive()
        ));
        api.delete_version(version.id)?;
        deleted += 1;
    }

    ctx.success(&format!(
        "Done. Deleted {deleted} untagged image version(s) older than 2 years."
    ));
    Ok(PruneSummary {
        fetched: versions.len(),
        deleted,
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
