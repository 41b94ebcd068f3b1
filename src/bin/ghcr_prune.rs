//! `ghcr-prune` — delete untagged GHCR container image versions older than
//! the retention window.

use clap::Parser;

use ghcr_tools::config::PruneConfig;
use ghcr_tools::github::PackagesClient;
use ghcr_tools::output::OutputContext;
use ghcr_tools::prune;

/// Delete untagged container image versions older than 2 years.
///
/// Driven entirely by the environment: GITHUB_TOKEN (packages scope) and
/// GITHUB_REPOSITORY ("owner/repo"; the package name equals the repository
/// name). GITHUB_API_URL optionally overrides the API base.
#[derive(Parser)]
#[command(name = "ghcr-prune", version)]
struct Cli {}

fn main() {
    let Cli {} = Cli::parse();
    let ctx = OutputContext::new(false, false);
    if let Err(e) = run(&ctx) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(ctx: &OutputContext) -> anyhow::Result<()> {
    // Configuration is validated before any network activity.
    let cfg = PruneConfig::from_env()?;
    let client = PackagesClient::new(&cfg);
    prune::run(&client, ctx, &cfg.owner, &cfg.package)?;
    Ok(())
}
